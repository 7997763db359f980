use sprk_core::button::{ButtonVariant, button_classes};
use sprk_core::spinner::DEFAULT_ARIA_LABEL;
use yew::prelude::*;

use super::spinner::SprkSpinner;

/// Properties for [`SprkButton`].
#[derive(Properties, PartialEq)]
pub struct SprkButtonProps {
    /// Button content, replaced by a spinner while spinning.
    #[prop_or_default]
    pub children: Children,
    /// Color variant.
    #[prop_or_default]
    pub variant: ButtonVariant,
    /// Disabled style and attribute.
    #[prop_or_default]
    pub disabled: bool,
    /// Show a spinner in place of the content.
    #[prop_or_default]
    pub is_spinning: bool,
    /// `aria-label` while spinning.
    #[prop_or(AttrValue::Static(DEFAULT_ARIA_LABEL))]
    pub spinning_aria_label: AttrValue,
    /// Renders an anchor with `role="button"` when set.
    #[prop_or_default]
    pub href: Option<AttrValue>,
    /// `data-id` for automated tools.
    #[prop_or_default]
    pub id_string: Option<AttrValue>,
    /// `data-analytics` for analytics capture.
    #[prop_or_default]
    pub analytics_string: Option<AttrValue>,
    /// Extra classes on the button.
    #[prop_or_default]
    pub class: Classes,
    /// Click handler.
    #[prop_or_default]
    pub onclick: Callback<MouseEvent>,
}

/// Spark button; an anchor when `href` is set.
#[function_component(SprkButton)]
pub fn sprk_button(props: &SprkButtonProps) -> Html {
    let classes = classes!(
        button_classes(props.variant, props.disabled),
        props.class.clone()
    );
    let aria_label = props
        .is_spinning
        .then(|| props.spinning_aria_label.clone());
    let content = if props.is_spinning {
        html! { <SprkSpinner options={props.variant.spinner_options()} /> }
    } else {
        html! { <>{ for props.children.iter() }</> }
    };

    if let Some(href) = props.href.clone() {
        html! {
            <a
                class={classes}
                role="button"
                href={href}
                data-id={props.id_string.clone()}
                data-analytics={props.analytics_string.clone()}
                aria-label={aria_label}
                onclick={props.onclick.clone()}
            >
                { content }
            </a>
        }
    } else {
        html! {
            <button
                class={classes}
                disabled={props.disabled}
                data-id={props.id_string.clone()}
                data-analytics={props.analytics_string.clone()}
                aria-label={aria_label}
                onclick={props.onclick.clone()}
            >
                { content }
            </button>
        }
    }
}
