mod animation;
mod components;
mod game;
mod log;

fn main() {
    yew::start_app::<components::app::App>();
}
