use std::fmt;

pub type ID = u32;
pub type PIN = u16;

/// Reduces the ordered input pin values of a gate to its output value.
pub type BinaryLogicReducer = fn(&[bool]) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompKind {
    Input,
    Output,
    OutputLed,
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl CompKind {
    pub const ALL: [CompKind; 10] = [
        CompKind::Input,
        CompKind::Output,
        CompKind::OutputLed,
        CompKind::And,
        CompKind::Or,
        CompKind::Not,
        CompKind::Nand,
        CompKind::Nor,
        CompKind::Xor,
        CompKind::Xnor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CompKind::Input => "INPUT",
            CompKind::Output => "OUTPUT",
            CompKind::OutputLed => "OUTPUT_LED",
            CompKind::And => "AND",
            CompKind::Or => "OR",
            CompKind::Not => "NOT",
            CompKind::Nand => "NAND",
            CompKind::Nor => "NOR",
            CompKind::Xor => "XOR",
            CompKind::Xnor => "XNOR",
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, CompKind::Input)
    }

    /// Sinks forward whatever drives their single pin.
    pub fn is_sink(&self) -> bool {
        matches!(self, CompKind::Output | CompKind::OutputLed)
    }

    pub fn is_gate(&self) -> bool {
        !self.is_input() && !self.is_sink()
    }
}

impl fmt::Display for CompKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Position {
        Position { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Edit,
    Simulate,
}
