use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct Props {
    pub x: f64,
    pub y: f64,
    pub font_size: String,
    #[prop_or_default]
    pub children: Children,
    pub onclick: Callback<web_sys::MouseEvent>,
}

/// SVG text button with a fitted backdrop, measured after the first render.
#[function_component(Button)]
pub fn button(props: &Props) -> Html {
    let Props {
        x,
        y,
        font_size,
        children,
        onclick,
    } = props;

    let backdrop = use_state(|| html! { <></> });
    let text_ref = use_node_ref();

    let cloned_backdrop = backdrop.clone();
    use_effect_with_deps(
        move |text_ref: &NodeRef| {
            if let Some(text) = text_ref.cast::<web_sys::SvgGraphicsElement>() {
                if let Ok(rect) = text.get_b_box() {
                    let pad = rect.height() * 0.4;
                    let x = (rect.x() as f64 - pad as f64).to_string();
                    let y = (rect.y() as f64 - pad as f64 / 2.).to_string();
                    let width = (rect.width() as f64 + pad as f64 * 2.).to_string();
                    let height = (rect.height() as f64 + pad as f64).to_string();
                    cloned_backdrop.set(html! {
                        <rect x={x} y={y} width={width} height={height} rx="6" class="button-backdrop" />
                    });
                }
            }
            || ()
        },
        text_ref.clone(),
    );

    html! {
        <>
            {(*backdrop).clone()}
            <text
                x={x.to_string()}
                y={y.to_string()}
                font-size={font_size.clone()}
                onclick={onclick.clone()}
                class="button-label"
                dominant-baseline="middle"
                text-anchor="middle"
                ref={text_ref}>
                { for children.iter() }
            </text>
        </>
    }
}
