use std::collections::{BTreeMap, HashSet};

use log::trace;

use crate::{
    circuit::Circuit,
    components::evaluate,
    types::{CompKind, ID, PIN},
};

/// Resolved value of `id`, walking back through its drivers.
///
/// `visiting` holds the components on the current path only. Each
/// descent works on its own copy so that fan-out siblings never see
/// each other; meeting a component already on the path yields `false`.
pub fn resolve(ckt: &Circuit, id: ID, visiting: &HashSet<ID>) -> bool {
    if visiting.contains(&id) {
        trace!("cycle at {}, resolving to false", id);
        return false;
    }
    let mut path = visiting.clone();
    path.insert(id);

    let comp = match ckt.component(id) {
        Some(c) => c,
        None => return false,
    };
    let val = match comp.kind {
        CompKind::Input => ckt.input_value(id),
        CompKind::Output | CompKind::OutputLed => match ckt.driver(id, 0) {
            Some(conn) => resolve(ckt, conn.from, &path),
            None => false,
        },
        kind => {
            let pins = (0..comp.input_arity())
                .map(|pin: PIN| match ckt.driver(id, pin) {
                    Some(conn) => resolve(ckt, conn.from, &path),
                    None => false,
                })
                .collect::<Vec<bool>>();
            evaluate(kind, &pins)
        }
    };
    trace!("{} ({}) = {}", comp.label, comp.kind, val);
    val
}

/// One evaluation pass: every non-input component resolved from scratch.
pub fn resolve_all(ckt: &Circuit) -> BTreeMap<ID, bool> {
    ckt.components()
        .filter(|c| !c.kind.is_input())
        .map(|c| (c.id, resolve(ckt, c.id, &HashSet::new())))
        .collect()
}
