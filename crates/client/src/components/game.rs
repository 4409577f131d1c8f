use super::board::BoardLayer;
use super::button::Button;
use super::hud::Hud;
use crate::animation::FrameClock;
use crate::game::animation::FloatingSymbol;
use crate::game::{CrushGame, GameAction};
use common::config::{BoardConfig, GameRules};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use yew::prelude::*;

fn raf_loop(mut func: impl FnMut() + 'static) {
    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    let request_animation_frame = |window: &web_sys::Window, f: &Closure<dyn FnMut()>| {
        window
            .request_animation_frame(f.as_ref().unchecked_ref())
            .unwrap();
    };

    let window = web_sys::window().unwrap();
    let cloned_window = window.clone();
    *f.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        func();
        request_animation_frame(&cloned_window, g.borrow().as_ref().unwrap());
    }) as Box<dyn FnMut()>));
    request_animation_frame(&window, f.borrow().as_ref().unwrap());
}

#[derive(Clone, Copy, PartialEq)]
struct Drag {
    slot: usize,
    x: f64,
    y: f64,
}

#[derive(Clone, PartialEq, Properties)]
pub struct Props {
    pub config: BoardConfig,
    pub rules: GameRules,
}

#[function_component(Game)]
pub fn game_component(props: &Props) -> Html {
    let Props { config, rules } = props.clone();
    let cell_size = config.cell_size;
    let board_width = config.board_width();
    let board_height = config.board_height();
    let hud_band = 0.5 * cell_size;
    let total_height = hud_band + board_height + 1.5 * cell_size;

    let drag = use_state(|| None::<Drag>);
    let board_ref = use_node_ref();
    let init_config = config.clone();
    let game = use_reducer(move || {
        let seed = u64::from_be_bytes(js_sys::Math::random().to_be_bytes());
        CrushGame::new(init_config, rules, seed)
    });

    {
        let game = game.clone();
        use_effect_with_deps(
            move |_| {
                let clock = Rc::new(RefCell::new(FrameClock::new()));
                raf_loop(move || {
                    let frames = clock.borrow_mut().tick();
                    if frames > 0 {
                        game.dispatch(GameAction::Animate { frames });
                    }
                });
                || ()
            },
            (),
        );
    }

    let position = board_ref.cast::<web_sys::Element>().map(|board| {
        let rect = board.get_bounding_client_rect();
        (rect.x(), rect.y() + hud_band)
    });

    let begin_drag = {
        let game = game.clone();
        let drag = drag.clone();
        move |x: f64, y: f64| {
            let slot = {
                let board = game.board();
                board.strip_slot_at(x, y).filter(|&slot| board.can_drag(slot))
            };
            if let Some(slot) = slot {
                drag.set(Some(Drag { slot, x, y }));
            }
        }
    };

    let finish_drag = {
        let game = game.clone();
        let drag = drag.clone();
        move |d: Drag, x: f64, y: f64| {
            drag.set(None);
            let from = (x - cell_size / 2., y - cell_size / 2.);
            let drop = game.board().resolve_drop(x, y);
            match drop {
                Some(drop) => game.dispatch(GameAction::SymbolDropped {
                    slot: d.slot,
                    drop,
                    from,
                }),
                None => game.dispatch(GameAction::DragCancelled { slot: d.slot, from }),
            }
        }
    };

    let onmousedown = {
        let begin_drag = begin_drag.clone();
        Callback::from(move |event: web_sys::MouseEvent| {
            event.prevent_default();
            if let Some((left, top)) = position {
                begin_drag(event.client_x() as f64 - left, event.client_y() as f64 - top);
            }
        })
    };

    let onmousemove = {
        let drag = drag.clone();
        Callback::from(move |event: web_sys::MouseEvent| {
            if let (Some(d), Some((left, top))) = (*drag, position) {
                drag.set(Some(Drag {
                    slot: d.slot,
                    x: event.client_x() as f64 - left,
                    y: event.client_y() as f64 - top,
                }));
            }
        })
    };

    let onmouseup = {
        let drag = drag.clone();
        let finish_drag = finish_drag.clone();
        Callback::from(move |event: web_sys::MouseEvent| {
            if let (Some(d), Some((left, top))) = (*drag, position) {
                finish_drag(
                    d,
                    event.client_x() as f64 - left,
                    event.client_y() as f64 - top,
                );
            }
        })
    };

    let ontouchstart = {
        let begin_drag = begin_drag.clone();
        Callback::from(move |event: web_sys::TouchEvent| {
            event.prevent_default();
            if let (Some(touch), Some((left, top))) = (event.target_touches().item(0), position) {
                begin_drag(touch.client_x() as f64 - left, touch.client_y() as f64 - top);
            }
        })
    };

    let ontouchmove = {
        let drag = drag.clone();
        Callback::from(move |event: web_sys::TouchEvent| {
            if let (Some(d), Some(touch), Some((left, top))) =
                (*drag, event.target_touches().item(0), position)
            {
                drag.set(Some(Drag {
                    slot: d.slot,
                    x: touch.client_x() as f64 - left,
                    y: touch.client_y() as f64 - top,
                }));
            }
        })
    };

    let ontouchend = {
        let drag = drag.clone();
        let finish_drag = finish_drag.clone();
        Callback::from(move |event: web_sys::TouchEvent| {
            event.prevent_default();
            if let Some(d) = *drag {
                match (event.changed_touches().item(0), position) {
                    (Some(touch), Some((left, top))) => finish_drag(
                        d,
                        touch.client_x() as f64 - left,
                        touch.client_y() as f64 - top,
                    ),
                    _ => finish_drag(d, d.x, d.y),
                }
            }
        })
    };

    let on_restart = {
        let game = game.clone();
        Callback::from(move |_event: web_sys::MouseEvent| {
            game.dispatch(GameAction::Restart);
        })
    };

    // one frame of the board; the dragged symbol is lifted out and follows
    // the pointer instead
    let dragged_id = (*drag).and_then(|d| game.board().strip_instance_id(d.slot));
    let symbols: Vec<FloatingSymbol> = game
        .board_frame()
        .into_iter()
        .filter(|symbol| Some(symbol.id) != dragged_id)
        .collect();
    let dragged_symbol = (*drag).and_then(|d| {
        let board = game.board();
        board
            .strip_instance_id(d.slot)
            .zip(board.strip_kind(d.slot))
            .map(|(id, kind)| FloatingSymbol {
                id,
                kind,
                x: d.x - cell_size / 2.,
                y: d.y - cell_size / 2.,
                opacity: 1.,
            })
    });

    let catalog = game.catalog().clone();
    let disabled = game.board().is_disabled();
    let clipped = game.board().is_cascading();
    let mask = config.mask_region();

    let hinted: BTreeSet<usize> = game
        .context
        .possible_wins
        .values()
        .flat_map(|indices| indices.iter().copied())
        .collect();

    let background = (0..config.columns).flat_map(|column| {
        let cell_texture = config.cell_texture.clone();
        (0..config.rows).map(move |row| {
            let x = (column as f64 * cell_size).to_string();
            let y = (row as f64 * cell_size).to_string();
            let size = cell_size.to_string();
            html! {
                <rect
                    x={x}
                    y={y}
                    width={size.clone()}
                    height={size.clone()}
                    class={cell_texture.clone()} />
            }
        })
    });

    let hints = hinted.iter().map(|&index| {
        let column = index % config.columns;
        let row = index / config.columns;
        let x = (column as f64 * cell_size).to_string();
        let y = (row as f64 * cell_size).to_string();
        let size = cell_size.to_string();
        html! {
            <rect x={x} y={y} width={size.clone()} height={size.clone()} class="hint" />
        }
    });

    let strip_x = board_width / 2. - config.option_count as f64 / 2. * cell_size;
    let strip_y = board_height + 0.4 * cell_size;

    let terminal = if !game.context.is_game_over {
        None
    } else if game.context.game_won {
        Some((
            "GAME WON",
            format!(
                "Your score: {}  Moves left: {}",
                game.context.score,
                game.moves_left()
            ),
            "Play Again",
        ))
    } else {
        Some((
            "GAME OVER",
            "You have run out of moves. Try again!".to_string(),
            "Restart",
        ))
    };

    let dragged_layer = match dragged_symbol {
        Some(symbol) => html! {
            <BoardLayer symbols={vec![symbol]} catalog={catalog.clone()} size={cell_size} />
        },
        None => html! {},
    };

    let overlay = match terminal {
        Some((headline, detail, action)) => html! {
            <g transform={format!("translate(0, {hud_band})")}>
                <rect
                    x="0"
                    y="0"
                    width={board_width.to_string()}
                    height={board_height.to_string()}
                    fill="rgba(0, 0, 0, 0.6)" />
                <text
                    x={(board_width / 2.).to_string()}
                    y={(board_height / 3.).to_string()}
                    font-size={format!("{}px", cell_size * 0.5)}
                    text-anchor="middle"
                    class="overlay-headline">
                    { headline }
                </text>
                <text
                    x={(board_width / 2.).to_string()}
                    y={(board_height / 2.).to_string()}
                    font-size={format!("{}px", cell_size * 0.2)}
                    text-anchor="middle"
                    class="overlay-detail">
                    { detail }
                </text>
                <Button
                    x={board_width / 2.}
                    y={board_height / 3. * 2.}
                    font_size={format!("{}px", cell_size * 0.3)}
                    onclick={on_restart.clone()}>
                    { action }
                </Button>
            </g>
        },
        None => html! {},
    };

    html! {
        <svg
            width={board_width.to_string()}
            height={total_height.to_string()}
            class="game"
            ref={board_ref}
            onmousedown={onmousedown}
            onmousemove={onmousemove}
            onmouseup={onmouseup}
            ontouchstart={ontouchstart}
            ontouchmove={ontouchmove}
            ontouchend={ontouchend}>
            <defs>
                <clipPath id="board-clip">
                    <rect
                        x={mask.x.to_string()}
                        y={mask.y.to_string()}
                        width={mask.width.to_string()}
                        height={(mask.height + 1.9 * cell_size).to_string()} />
                </clipPath>
            </defs>
            <Hud
                score={game.displayed_score()}
                moves_left={game.moves_left()}
                restart_enabled={game.restart_enabled()}
                on_restart={on_restart.clone()}
                width={board_width}
                cell_size={cell_size} />
            <g
                transform={format!("translate(0, {hud_band})")}
                opacity={if disabled { "0.5" } else { "1" }}>
                { for background }
                <rect
                    x={strip_x.to_string()}
                    y={strip_y.to_string()}
                    width={(config.option_count as f64 * cell_size).to_string()}
                    height={cell_size.to_string()}
                    class={config.cell_texture.clone()} />
                { for hints }
                <g clip-path={clipped.then(|| "url(#board-clip)".to_string())}>
                    <BoardLayer symbols={symbols} catalog={catalog.clone()} size={cell_size} />
                </g>
                { dragged_layer }
            </g>
            { overlay }
        </svg>
    }
}
