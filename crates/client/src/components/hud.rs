use super::button::Button;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct Props {
    pub score: u32,
    pub moves_left: u32,
    pub restart_enabled: bool,
    pub on_restart: Callback<web_sys::MouseEvent>,
    pub width: f64,
    pub cell_size: f64,
}

/// Score, remaining moves and the restart control, laid out over the top of
/// the board.
#[function_component(Hud)]
pub fn hud(props: &Props) -> Html {
    let Props {
        score,
        moves_left,
        restart_enabled,
        on_restart,
        width,
        cell_size,
    } = props.clone();

    let font_size = format!("{}px", cell_size * 0.22);
    let score_y = (cell_size * 0.3).to_string();
    let moves_x = width.to_string();
    let restart_x = width / 2.;
    let restart_y = cell_size * 0.3;

    let restart = if restart_enabled {
        html! {
            <Button x={restart_x} y={restart_y} font_size={font_size.clone()} onclick={on_restart}>
                { "Restart" }
            </Button>
        }
    } else {
        html! {
            <text
                x={restart_x.to_string()}
                y={restart_y.to_string()}
                font-size={font_size.clone()}
                text-anchor="middle"
                dominant-baseline="middle"
                opacity="0.4"
                class="hud-text">
                { "Restart" }
            </text>
        }
    };

    html! {
        <g class="hud">
            <text x="0" y={score_y.clone()} font-size={font_size.clone()} class="hud-text">
                { format!("Score: {score}") }
            </text>
            <text
                x={moves_x}
                y={score_y}
                font-size={font_size}
                text-anchor="end"
                class="hud-text">
                { format!("Moves Left: {moves_left}") }
            </text>
            { restart }
        </g>
    }
}
