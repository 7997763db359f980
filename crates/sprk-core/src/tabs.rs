//! Active-tab helpers shared by the stepper and the stand-alone tabs component.
//!
//! # Design
//! - Tabs and panels pair up by index; a missing panel is tolerated.
//! - The active class on the tab element is the only record of which tab is active.
//! - Keyboard navigation wraps at both ends.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::SprkConfig;
use crate::dom::{DomElement, DomEvent, EventKind, NavKey};
use crate::error::DomResult;
use crate::selector::{Selector, for_each_element};

/// Marks a tabs component container.
pub const ATTR_TABS: &str = "data-sprk-tabs";

/// Class names used when toggling tabs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabStyle {
    /// Class marking the active tab.
    pub active: String,
    /// Class hiding inactive panels.
    pub hidden_panel: String,
    /// Class marking an engaged slider indicator.
    pub slider_active: String,
}

impl TabStyle {
    /// Classes for stepper steps.
    #[must_use]
    pub fn stepper(config: &SprkConfig) -> Self {
        Self {
            active: config.stepper.selected.clone(),
            hidden_panel: config.hidden_panel.clone(),
            slider_active: config.stepper.slider_active.clone(),
        }
    }

    /// Classes for the stand-alone tabs component.
    #[must_use]
    pub fn tabs(config: &SprkConfig) -> Self {
        Self {
            active: config.tabs.active.clone(),
            hidden_panel: config.hidden_panel.clone(),
            slider_active: config.stepper.slider_active.clone(),
        }
    }
}

/// Index of the first tab carrying `active_class`, or `None`.
#[must_use]
pub fn find_active_index<E: DomElement>(tabs: &[E], active_class: &str) -> Option<usize> {
    tabs.iter().position(|tab| tab.has_class(active_class))
}

/// Index a navigation key moves to from `current` in a list of `len` tabs.
///
/// With nothing active, `Next` lands on the first tab and `Previous` on the last.
#[must_use]
pub const fn target_index(current: Option<usize>, len: usize, key: NavKey) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    match key {
        NavKey::Previous => match current {
            Some(index) if index > 0 && index <= last => Some(index - 1),
            _ => Some(last),
        },
        NavKey::Next => match current {
            Some(index) if index < last => Some(index + 1),
            _ => Some(0),
        },
        NavKey::First => Some(0),
        NavKey::Last => Some(last),
        NavKey::Tab => None,
    }
}

/// Mark `tab` active, reveal its panel, focus it, and move the slider onto it.
///
/// # Errors
///
/// Propagates adapter failures.
pub fn activate_tab<E: DomElement>(
    tab: &E,
    panel: Option<&E>,
    style: &TabStyle,
    slider: Option<&E>,
) -> DomResult<()> {
    tab.add_class(&style.active)?;
    tab.set_attribute("tabindex", "0")?;
    tab.set_attribute("aria-selected", "true")?;
    if let Some(panel) = panel {
        panel.remove_class(&style.hidden_panel)?;
        panel.set_attribute("tabindex", "0")?;
    }
    tab.focus()?;
    if let Some(slider) = slider {
        let geometry = tab.geometry();
        slider.set_style_property("top", &format!("{}px", geometry.top))?;
        slider.set_style_property("height", &format!("{}px", geometry.height))?;
        slider.add_class(&style.slider_active)?;
    }
    Ok(())
}

/// Clear the active state from every tab, hide every panel, and park the slider.
///
/// # Errors
///
/// Propagates adapter failures.
pub fn deactivate_all<E: DomElement>(
    tabs: &[E],
    panels: &[E],
    style: &TabStyle,
    slider: Option<&E>,
) -> DomResult<()> {
    for tab in tabs {
        tab.remove_class(&style.active)?;
        tab.set_attribute("tabindex", "-1")?;
        tab.set_attribute("aria-selected", "false")?;
    }
    for panel in panels {
        panel.add_class(&style.hidden_panel)?;
        panel.set_attribute("tabindex", "-1")?;
    }
    if let Some(slider) = slider {
        slider.remove_class(&style.slider_active)?;
    }
    Ok(())
}

/// Deactivate everything, then activate the tab at `index` and its panel.
///
/// # Errors
///
/// Propagates adapter failures.
pub fn select_index<E: DomElement>(
    index: usize,
    tabs: &[E],
    panels: &[E],
    style: &TabStyle,
    slider: Option<&E>,
) -> DomResult<()> {
    let Some(tab) = tabs.get(index) else {
        return Ok(());
    };
    deactivate_all(tabs, panels, style, slider)?;
    activate_tab(tab, panels.get(index), style, slider)
}

/// Apply a keydown raised on a tab; returns the newly active index when navigation happened.
///
/// `Tab` moves focus into the active panel and cancels the default focus move
/// only when that panel exists. `Shift+Tab` is left to the browser.
///
/// # Errors
///
/// Propagates adapter failures.
pub fn handle_keydown<E: DomElement>(
    event: &DomEvent,
    tabs: &[E],
    panels: &[E],
    style: &TabStyle,
    slider: Option<&E>,
) -> DomResult<Option<usize>> {
    let Some(key) = event.key() else {
        return Ok(None);
    };
    let current = find_active_index(tabs, &style.active);
    if key == NavKey::Tab {
        if event.shift() {
            return Ok(None);
        }
        if let Some(panel) = current.and_then(|index| panels.get(index)) {
            panel.focus()?;
            event.prevent_default();
        }
        return Ok(None);
    }
    let Some(target) = target_index(current, tabs.len(), key) else {
        return Ok(None);
    };
    select_index(target, tabs, panels, style, slider)?;
    Ok(Some(target))
}

/// Live wiring for one tabs container; dropping it detaches every handler.
pub struct TabsBindings<E: DomElement> {
    tabs: Rc<Vec<E>>,
    _listeners: Vec<E::Listener>,
}

impl<E: DomElement> TabsBindings<E> {
    /// Tabs under management.
    #[must_use]
    pub fn tabs(&self) -> &[E] {
        &self.tabs
    }
}

/// Wire click and keyboard navigation for the `role="tab"` elements in `container`.
///
/// Returns `None` when the container has no tabs.
///
/// # Errors
///
/// Propagates adapter failures from the queries.
pub fn bind_tabs<E: DomElement>(
    container: &E,
    config: &SprkConfig,
) -> DomResult<Option<TabsBindings<E>>> {
    let tabs = Rc::new(container.query_selector_all(&Selector::attr_eq("role", "tab"))?);
    if tabs.is_empty() {
        return Ok(None);
    }
    let panels = Rc::new(container.query_selector_all(&Selector::attr_eq("role", "tabpanel"))?);
    let style = Rc::new(TabStyle::tabs(config));
    let mut listeners = Vec::with_capacity(tabs.len() * 2);

    for (index, tab) in tabs.iter().enumerate() {
        let (all, panels_for_click, style_for_click) =
            (Rc::clone(&tabs), Rc::clone(&panels), Rc::clone(&style));
        listeners.push(tab.listen(
            EventKind::Click,
            Box::new(move |event: &DomEvent| {
                event.prevent_default();
                if let Err(err) =
                    select_index(index, &all, &panels_for_click, &style_for_click, None)
                {
                    warn!(error = %err, index, "failed to activate tab");
                }
            }),
        ));

        let (all, panels_for_keys, style_for_keys) =
            (Rc::clone(&tabs), Rc::clone(&panels), Rc::clone(&style));
        listeners.push(tab.listen(
            EventKind::Keydown,
            Box::new(move |event: &DomEvent| {
                if let Err(err) =
                    handle_keydown(event, &all, &panels_for_keys, &style_for_keys, None)
                {
                    warn!(error = %err, index, "failed to handle tab keydown");
                }
            }),
        ));
    }

    debug!(tabs = tabs.len(), panels = panels.len(), "tabs bound");
    Ok(Some(TabsBindings {
        tabs,
        _listeners: listeners,
    }))
}

/// Bind every `[data-sprk-tabs="container"]` under `root`.
///
/// Containers without tabs are skipped; one failing container does not stop the rest.
///
/// # Errors
///
/// Propagates adapter failures from the container query.
pub fn init_tabs<E: DomElement>(root: &E, config: &SprkConfig) -> DomResult<Vec<TabsBindings<E>>> {
    let mut bound = Vec::new();
    for_each_element(root, &Selector::attr_eq(ATTR_TABS, "container"), |container| {
        match bind_tabs(container, config) {
            Ok(Some(bindings)) => bound.push(bindings),
            Ok(None) => debug!("tabs container without tabs skipped"),
            Err(err) => warn!(error = %err, "failed to bind tabs container"),
        }
    })?;
    Ok(bound)
}
