use super::game::Game;
use common::catalog::{AnimationSpec, SymbolStyle, WIN_ANIMATION};
use common::config::{BoardConfig, GameRules};
use std::collections::BTreeMap;
use yew::prelude::*;

fn fit_with_aspect_ratio(
    width: f64,
    height: f64,
    aspect_width: f64,
    aspect_height: f64,
) -> (f64, f64) {
    if width * aspect_height > height * aspect_width {
        (height * aspect_width / aspect_height, height)
    } else {
        (width, width * aspect_height / aspect_width)
    }
}

fn gem(name: &str, color: &str, win_frames: usize) -> (String, SymbolStyle) {
    let mut style = SymbolStyle::new(name, color);
    style.animations.insert(
        WIN_ANIMATION.to_string(),
        AnimationSpec {
            frames: win_frames,
            opacity: (1., 0.),
        },
    );
    (name.to_string(), style)
}

fn game_symbols() -> BTreeMap<String, SymbolStyle> {
    [
        gem("b", "#3D7BFF", 30),
        gem("g", "#3FBF6B", 30),
        gem("p", "#E05FD0", 24),
        gem("y", "#F2C23A", 36),
    ]
    .into_iter()
    .collect()
}

fn win_check(moves: u32, score: u32) -> bool {
    moves <= 25 && score >= 500
}

#[function_component(App)]
pub fn app() -> Html {
    let started = use_state(|| false);
    let window = web_sys::window().unwrap();
    let width = window.inner_width().unwrap().as_f64().unwrap();
    let height = window.inner_height().unwrap().as_f64().unwrap();

    // board plus HUD band and staging strip, measured in cells
    let (resized_width, _) = fit_with_aspect_ratio(width - 20., height - 20., 5., 7.);
    let cell_size = resized_width / 5.;

    let config = BoardConfig {
        cell_size,
        cell_texture: "cell".to_string(),
        symbols: game_symbols(),
        ..BoardConfig::default()
    };
    let rules = GameRules {
        win_check,
        ..GameRules::default()
    };

    let cloned_started = started.clone();
    let onclick = Callback::from(move |event: web_sys::MouseEvent| {
        event.prevent_default();
        cloned_started.set(true);
    });

    if *started {
        html! {
            <Game config={config} rules={rules} />
        }
    } else {
        html! {
            <div class="app">
                <h1>{"Crushed"}</h1>
                <h2>{"Drag a gem onto the board and line up three of a kind"}</h2>
                <h3><a href="#" onclick={onclick}>{"PLAY"}</a></h3>
            </div>
        }
    }
}
