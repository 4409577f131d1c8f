use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct Props {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    pub opacity: f64,
}

/// One gem on the board, drawn at a board-local pixel position.
#[function_component(Symbol)]
pub fn symbol(props: &Props) -> Html {
    let Props {
        x,
        y,
        size,
        color,
        opacity,
    } = props.clone();
    let cx = (x + size / 2.).to_string();
    let cy = (y + size / 2.).to_string();
    let r = (size * 0.38).to_string();
    html! {
        <circle
            cx={cx}
            cy={cy}
            r={r}
            fill={color}
            opacity={opacity.to_string()}
            class="symbol" />
    }
}
