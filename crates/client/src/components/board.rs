use super::symbol::Symbol;
use crate::game::animation::FloatingSymbol;
use common::catalog::SymbolCatalog;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct Props {
    pub symbols: Vec<FloatingSymbol>,
    pub catalog: Rc<SymbolCatalog>,
    pub size: f64,
}

/// Draws one frame of the board: every floating symbol, colored from the
/// catalog. Unknown kinds fall back to the placeholder color.
#[function_component(BoardLayer)]
pub fn board_layer(props: &Props) -> Html {
    let Props {
        symbols,
        catalog,
        size,
    } = props;

    let symbols = symbols.iter().map(|symbol| {
        let color = catalog.style_or_placeholder(symbol.kind).color.clone();
        html! {
            <Symbol
                key={symbol.id.to_string()}
                x={symbol.x}
                y={symbol.y}
                size={*size}
                color={color}
                opacity={symbol.opacity} />
        }
    });

    html! {
        { for symbols }
    }
}
