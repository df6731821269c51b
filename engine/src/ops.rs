use log::debug;

use crate::{
    circuit::Circuit,
    types::{CompKind, Mode, Position, ID, PIN},
};

/// A mutation requested by whatever front end drives the circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitOp {
    AddComponent(CompKind, Position),
    RemoveComponent(ID),
    Connect {
        from: ID,
        from_pin: PIN,
        to: ID,
        to_pin: PIN,
    },
    Disconnect(ID),
    SetInput(ID, bool),
    SetKind(ID, CompKind),
    SetLabel(ID, String),
    Move(ID, Position),
    SetMode(Mode),
    Evaluate,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    /// A component or connection was created with this id.
    Created(ID),
    Applied,
    /// Nothing changed; the reason is informational only.
    Ignored(String),
}

impl OpOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, OpOutcome::Ignored(_))
    }
    pub fn created_id(&self) -> Option<ID> {
        if let OpOutcome::Created(id) = self {
            Some(*id)
        } else {
            None
        }
    }
}

fn applied_if(done: bool, why: impl FnOnce() -> String) -> OpOutcome {
    if done {
        OpOutcome::Applied
    } else {
        OpOutcome::Ignored(why())
    }
}

impl Circuit {
    pub fn apply(&mut self, op: CircuitOp) -> OpOutcome {
        debug!("applying {:?}", op);
        match op {
            CircuitOp::AddComponent(kind, pos) => OpOutcome::Created(self.add_component_at(kind, pos)),
            CircuitOp::RemoveComponent(id) => {
                applied_if(self.remove_component(id), || format!("No component with id {}", id))
            }
            CircuitOp::Connect {
                from,
                from_pin,
                to,
                to_pin,
            } => match self.connect(from, from_pin, to, to_pin) {
                Ok(id) => OpOutcome::Created(id),
                Err(e) => OpOutcome::Ignored(e),
            },
            CircuitOp::Disconnect(id) => {
                applied_if(self.remove_connection(id), || format!("No connection with id {}", id))
            }
            CircuitOp::SetInput(id, val) => {
                applied_if(self.set_input_value(id, val), || format!("{} is not an input", id))
            }
            CircuitOp::SetKind(id, kind) => match self.set_component_kind(id, kind) {
                Ok(()) => OpOutcome::Applied,
                Err(e) => OpOutcome::Ignored(e),
            },
            CircuitOp::SetLabel(id, label) => {
                applied_if(self.set_component_label(id, &label), || format!("No component with id {}", id))
            }
            CircuitOp::Move(id, pos) => {
                applied_if(self.update_component_position(id, pos), || format!("No component with id {}", id))
            }
            CircuitOp::SetMode(mode) => {
                self.set_mode(mode);
                OpOutcome::Applied
            }
            CircuitOp::Evaluate => {
                self.evaluate();
                OpOutcome::Applied
            }
            CircuitOp::Reset => {
                self.reset();
                OpOutcome::Applied
            }
        }
    }
}
