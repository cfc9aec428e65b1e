//! Deterministic terminal layouts per component kind.
//!
//! Layouts depend only on the component kind and its size, so the same
//! component always exposes the same terminals. Offsets are measured from the
//! component's top-left corner; rotation is not applied.

use crate::model::{Component, ComponentKind, ConductorClass, Terminal, TerminalRole, TerminalSpec};
use sld_geom::Point;

/// Derives the terminal layout for a component kind of the given size.
pub fn terminal_layout(kind: ComponentKind, width: f64, height: f64) -> Vec<TerminalSpec> {
    use ConductorClass as C;
    use TerminalRole as R;

    let top = Point::new(width / 2.0, 0.0);
    let bottom = Point::new(width / 2.0, height);
    let left = Point::new(0.0, height / 2.0);
    let right = Point::new(width, height / 2.0);

    match kind {
        ComponentKind::Panel => vec![
            TerminalSpec::new("top", top, R::Input, C::Power),
            TerminalSpec::new("left", left, R::Output, C::Power),
            TerminalSpec::new("right", right, R::Output, C::Power),
        ],
        ComponentKind::Array => vec![TerminalSpec::new("bottom", bottom, R::Output, C::Dc)],
        ComponentKind::Inverter => vec![
            TerminalSpec::new("dc_in", left, R::Input, C::Dc),
            TerminalSpec::new("ac_out", right, R::Output, C::Ac),
            TerminalSpec::new("ground", bottom, R::Ground, C::Ground),
        ],
        ComponentKind::Combiner => vec![
            TerminalSpec::new("top", top, R::Input, C::Dc),
            TerminalSpec::new("bottom", bottom, R::Output, C::Dc),
        ],
        ComponentKind::Disconnect => vec![
            TerminalSpec::new("line", top, R::Input, C::Power),
            TerminalSpec::new("load", bottom, R::Output, C::Power),
        ],
        ComponentKind::Meter => vec![
            TerminalSpec::new("line", top, R::Input, C::Ac),
            TerminalSpec::new("load", bottom, R::Output, C::Ac),
        ],
        ComponentKind::Transformer => vec![
            TerminalSpec::new("primary", top, R::Input, C::Ac),
            TerminalSpec::new("secondary", bottom, R::Output, C::Ac),
        ],
        ComponentKind::Battery => vec![
            TerminalSpec::new("dc", top, R::Bidirectional, C::Dc),
            TerminalSpec::new("ground", bottom, R::Ground, C::Ground),
        ],
        ComponentKind::Generator => vec![
            TerminalSpec::new("output", right, R::Output, C::Ac),
            TerminalSpec::new("ground", bottom, R::Ground, C::Ground),
        ],
        ComponentKind::Utility => vec![TerminalSpec::new("service", bottom, R::Bidirectional, C::Ac)],
        ComponentKind::Load => vec![
            TerminalSpec::new("input", top, R::Input, C::Power),
            TerminalSpec::new("neutral", bottom, R::Neutral, C::Power),
        ],
        ComponentKind::Ground => vec![TerminalSpec::new("ground", top, R::Ground, C::Ground)],
        ComponentKind::Controller => vec![
            TerminalSpec::new("input", left, R::Input, C::Control),
            TerminalSpec::new("output", right, R::Output, C::Control),
        ],
        ComponentKind::Generic => vec![
            TerminalSpec::new("input", left, R::Input, C::Power),
            TerminalSpec::new("output", right, R::Output, C::Power),
        ],
    }
}

/// Resolves a component's terminals to absolute coordinates.
///
/// An explicit terminal list on the component wins over the derived layout.
pub fn component_terminals(component: &Component) -> Vec<Terminal> {
    let specs = match &component.terminals {
        Some(explicit) => explicit.clone(),
        None => terminal_layout(component.component_kind(), component.width, component.height),
    };
    specs
        .into_iter()
        .map(|spec| Terminal {
            component: component.id.clone(),
            position: component.position.offset(spec.offset.x, spec.offset.y),
            id: spec.id,
            role: spec.role,
            class: spec.class,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_has_top_left_right() {
        let layout = terminal_layout(ComponentKind::Panel, 100.0, 60.0);
        let ids: Vec<&str> = layout.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["top", "left", "right"]);
        assert_eq!(layout[0].offset, Point::new(50.0, 0.0));
        assert_eq!(layout[2].offset, Point::new(100.0, 30.0));
    }

    #[test]
    fn array_has_single_bottom_output() {
        let layout = terminal_layout(ComponentKind::Array, 80.0, 40.0);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].role, TerminalRole::Output);
        assert_eq!(layout[0].offset, Point::new(40.0, 40.0));
    }

    #[test]
    fn layout_is_deterministic() {
        for kind in [ComponentKind::Inverter, ComponentKind::Battery, ComponentKind::Generic] {
            assert_eq!(terminal_layout(kind, 60.0, 30.0), terminal_layout(kind, 60.0, 30.0));
        }
    }

    #[test]
    fn absolute_positions_ignore_rotation() {
        let mut inv = Component::new("INV1", "inverter", Point::new(200.0, 100.0), 60.0, 40.0);
        inv.rotation = 90.0;
        let terminals = component_terminals(&inv);
        assert_eq!(terminals[0].position, Point::new(200.0, 120.0));
        assert_eq!(terminals[1].position, Point::new(260.0, 120.0));
        assert!(terminals.iter().all(|t| t.component == "INV1"));
    }

    #[test]
    fn explicit_terminals_override_layout() {
        let mut c = Component::new("X", "panel", Point::new(10.0, 10.0), 40.0, 40.0);
        c.terminals = Some(vec![TerminalSpec::new(
            "aux",
            Point::new(0.0, 5.0),
            TerminalRole::Bidirectional,
            ConductorClass::Control,
        )]);
        let terminals = component_terminals(&c);
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].id, "aux");
        assert_eq!(terminals[0].position, Point::new(10.0, 15.0));
    }
}
