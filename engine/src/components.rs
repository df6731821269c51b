use std::fmt;

use crate::{
    bootstrap::definition,
    types::{BinaryLogicReducer, CompKind, Position, ID, PIN},
};

#[derive(Clone)]
pub struct ComponentDefParams {
    pub kind: CompKind,
    pub symbol: &'static str,
    pub eval: BinaryLogicReducer,
    pub default_inputs: PIN,
    pub default_outputs: PIN,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ID,
    pub kind: CompKind,
    pub label: String,
    pub position: Position,
    n_inp: PIN,
    n_out: PIN,
}

impl Component {
    pub fn from_params(id: ID, p: ComponentDefParams) -> Component {
        Component {
            id,
            kind: p.kind,
            label: format!("{}_{}", p.kind.name(), id),
            position: Position::default(),
            n_inp: p.default_inputs,
            n_out: p.default_outputs,
        }
    }

    pub fn new(id: ID, kind: CompKind) -> Component {
        Component::from_params(id, definition(kind))
    }

    pub fn input_arity(&self) -> PIN {
        self.n_inp
    }

    pub fn output_arity(&self) -> PIN {
        self.n_out
    }

    // arities stay fixed, so only kinds with the same pin layout can be swapped in
    pub(crate) fn change_kind(&mut self, kind: CompKind) -> Result<(), String> {
        let def = definition(kind);
        if def.default_inputs != self.n_inp || def.default_outputs != self.n_out {
            return Err(format!(
                "{} has {}/{} pins, {} needs {}/{}",
                self.kind, self.n_inp, self.n_out, kind, def.default_inputs, def.default_outputs
            ));
        }
        self.kind = kind;
        Ok(())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} input{}) - Label: \x1b[33m{}\x1b[0m",
            self.kind,
            self.n_inp,
            if self.n_inp == 1 { "" } else { "s" },
            self.label,
        )
    }
}

/// A wire from an output pin of `from` to an input pin of `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub id: ID,
    pub from: ID,
    pub from_pin: PIN,
    pub to: ID,
    pub to_pin: PIN,
}

impl Connection {
    pub fn touches(&self, id: ID) -> bool {
        self.from == id || self.to == id
    }
}

/// Gate evaluator: output of `kind` for the ordered pin values in `inputs`.
pub fn evaluate(kind: CompKind, inputs: &[bool]) -> bool {
    (definition(kind).eval)(inputs)
}
