use sprk_core::spinner::{SpinnerOptions, spinner_classes};
use yew::prelude::*;

/// Properties for [`SprkSpinner`].
#[derive(Properties, PartialEq)]
pub struct SprkSpinnerProps {
    /// Size, lightness and variant.
    #[prop_or_default]
    pub options: SpinnerOptions,
    /// Extra classes on the spinner element.
    #[prop_or_default]
    pub class: Classes,
}

/// Circular spinner.
#[function_component(SprkSpinner)]
pub fn sprk_spinner(props: &SprkSpinnerProps) -> Html {
    let classes = classes!(spinner_classes(&props.options), props.class.clone());
    html! { <div class={classes} /> }
}
