use crate::{components::ComponentDefParams, types::CompKind};

// reducers see only the pins that exist; an empty slice is the
// "nothing wired at all" case and each gate picks its own default.

pub(crate) fn definition(kind: CompKind) -> ComponentDefParams {
    match kind {
        CompKind::Input => ComponentDefParams {
            kind,
            symbol: "",
            // never called: inputs read the input value map
            eval: |_| false,
            default_inputs: 0,
            default_outputs: 1,
        },
        CompKind::Output | CompKind::OutputLed => ComponentDefParams {
            kind,
            symbol: "",
            eval: |v| v.first().copied().unwrap_or(false),
            default_inputs: 1,
            default_outputs: 0,
        },
        CompKind::And => ComponentDefParams {
            kind,
            symbol: ".",
            eval: |v| !v.is_empty() && v.iter().all(|b| *b),
            default_inputs: 2,
            default_outputs: 1,
        },
        CompKind::Or => ComponentDefParams {
            kind,
            symbol: "+",
            eval: |v| v.iter().any(|b| *b),
            default_inputs: 2,
            default_outputs: 1,
        },
        CompKind::Not => ComponentDefParams {
            kind,
            symbol: "!",
            eval: |v| match v.first() {
                Some(b) => !*b,
                None => true,
            },
            default_inputs: 1,
            default_outputs: 1,
        },
        CompKind::Nand => ComponentDefParams {
            kind,
            symbol: "!.",
            eval: |v| v.is_empty() || !v.iter().all(|b| *b),
            default_inputs: 2,
            default_outputs: 1,
        },
        CompKind::Nor => ComponentDefParams {
            kind,
            symbol: "!+",
            eval: |v| !v.iter().any(|b| *b),
            default_inputs: 2,
            default_outputs: 1,
        },
        CompKind::Xor => ComponentDefParams {
            kind,
            symbol: "^",
            eval: |v| v.len() == 2 && v[0] != v[1],
            default_inputs: 2,
            default_outputs: 1,
        },
        CompKind::Xnor => ComponentDefParams {
            kind,
            symbol: "!^",
            eval: |v| v.len() == 2 && v[0] == v[1],
            default_inputs: 2,
            default_outputs: 1,
        },
    }
}
