//! Obstacle model: padded component bodies plus absolute terminal positions.
//!
//! Built once per batch and discarded afterwards. Nothing here outlives the
//! call that created it.

use crate::error::RouteError;
use crate::ids::ObstacleId;
use crate::model::{Component, Endpoint, Terminal, TerminalRole};
use crate::terminals::component_terminals;
use serde::{Deserialize, Serialize};
use sld_geom::Rect;
use std::collections::HashMap;

/// Obstacles with a priority above this are critical to cross.
pub const CRITICAL_PRIORITY: u8 = 7;

/// A padded avoidance zone around one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Index within the owning model.
    pub id: ObstacleId,
    /// Component the zone shadows.
    pub component: String,
    /// Component bounds inflated by the padding.
    pub rect: Rect,
    /// Avoidance weight; higher is avoided more strongly.
    pub priority: u8,
}

impl Obstacle {
    /// Returns `true` if crossing this obstacle is a critical collision.
    pub fn is_critical(&self) -> bool {
        self.priority > CRITICAL_PRIORITY
    }
}

/// Obstacles and terminals for one routing batch.
#[derive(Debug, Clone, Default)]
pub struct ObstacleModel {
    obstacles: Vec<Obstacle>,
    terminals: Vec<Terminal>,
    by_component: HashMap<String, Vec<usize>>,
}

impl ObstacleModel {
    /// Builds the model from placed components.
    ///
    /// Every component becomes one obstacle, even a zero-size one: its
    /// rectangle is simply the padding square around its position.
    pub fn build(components: &[Component], padding: f64) -> Self {
        let mut model = ObstacleModel::default();
        for (index, component) in components.iter().enumerate() {
            model.obstacles.push(Obstacle {
                id: ObstacleId::from_raw(index as u32),
                component: component.id.clone(),
                rect: component.bounds().inflate(padding),
                priority: component
                    .priority
                    .unwrap_or_else(|| component.component_kind().default_priority()),
            });

            let slots = model.by_component.entry(component.id.clone()).or_default();
            for terminal in component_terminals(component) {
                slots.push(model.terminals.len());
                model.terminals.push(terminal);
            }
        }
        model
    }

    /// All obstacles, in component order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// All terminals with absolute coordinates.
    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    /// The obstacles grown by a further `extra` on every side.
    pub fn inflated(&self, extra: f64) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .map(|o| Obstacle {
                rect: o.rect.inflate(extra),
                ..o.clone()
            })
            .collect()
    }

    /// Resolves one end of a connection to a terminal.
    ///
    /// A named terminal must exist. Otherwise the first terminal whose role
    /// appears in `preferred` wins, earlier roles first; failing that, the
    /// component's first declared terminal.
    pub fn resolve_terminal(
        &self,
        endpoint: &Endpoint,
        preferred: &[TerminalRole],
    ) -> Result<&Terminal, RouteError> {
        let slots = self
            .by_component
            .get(&endpoint.component)
            .ok_or_else(|| RouteError::UnknownComponent(endpoint.component.clone()))?;
        let mut candidates = slots.iter().map(|&i| &self.terminals[i]);

        if let Some(wanted) = &endpoint.terminal {
            return candidates
                .find(|t| &t.id == wanted)
                .ok_or_else(|| RouteError::UnknownTerminal {
                    component: endpoint.component.clone(),
                    terminal: wanted.clone(),
                });
        }

        let terminals: Vec<&Terminal> = candidates.collect();
        let by_role = preferred
            .iter()
            .find_map(|role| terminals.iter().find(|t| t.role == *role));
        match by_role.or(terminals.first()) {
            Some(terminal) => Ok(*terminal),
            None => Err(RouteError::NoTerminals(endpoint.component.clone())),
        }
    }
}
