use std::{
    collections::{BTreeMap, HashMap},
    mem,
    ops::{Deref, DerefMut},
};

use log::{debug, warn};

use crate::{
    components::{Component, Connection},
    resolver::resolve_all,
    table::{bitwise_counter, TruthRow, TruthTable},
    types::{CompKind, Mode, Position, ID, PIN},
};

/// Owns everything the engine knows about one circuit.
///
/// Components, connections and input values are the source of truth.
/// Output values are derived and only replaced by [`Circuit::evaluate`].
#[derive(Default)]
pub struct Circuit {
    components: BTreeMap<ID, Component>,
    connections: BTreeMap<ID, Connection>,
    // (to, to_pin) -> connection id; one driver per input pin
    drivers: HashMap<(ID, PIN), ID>,
    input_values: HashMap<ID, bool>,
    output_values: BTreeMap<ID, bool>,
    mode: Mode,
    last_id: ID,
}

impl Circuit {
    pub fn new() -> Circuit {
        Circuit::default()
    }

    fn new_id(&mut self) -> ID {
        self.last_id += 1;
        self.last_id
    }

    pub fn add_component(&mut self, kind: CompKind) -> ID {
        let id = self.new_id();
        let comp = Component::new(id, kind);
        debug!("added {}", comp);
        self.components.insert(id, comp);
        id
    }

    pub fn add_component_at(&mut self, kind: CompKind, position: Position) -> ID {
        let id = self.add_component(kind);
        self.update_component_position(id, position);
        id
    }

    /// Removes the component and every connection touching it. Unknown ids are ignored.
    pub fn remove_component(&mut self, id: ID) -> bool {
        let comp = match self.components.remove(&id) {
            Some(c) => c,
            None => {
                warn!("no component with id {}, nothing removed", id);
                return false;
            }
        };
        let attached = self
            .connections
            .values()
            .filter(|conn| conn.touches(id))
            .map(|conn| conn.id)
            .collect::<Vec<ID>>();
        for conn_id in attached {
            self.remove_connection(conn_id);
        }
        self.input_values.remove(&id);
        debug!("removed {}", comp.label);
        true
    }

    pub fn component(&self, id: ID) -> Option<&Component> {
        self.components.get(&id)
    }

    /// All components in creation order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn inputs(&self) -> Vec<ID> {
        self.ids_of(|k| k == CompKind::Input)
    }

    /// Components recorded as truth table outputs.
    pub fn outputs(&self) -> Vec<ID> {
        self.ids_of(|k| k == CompKind::Output)
    }

    fn ids_of(&self, pred: impl Fn(CompKind) -> bool) -> Vec<ID> {
        self.components
            .values()
            .filter(|c| pred(c.kind))
            .map(|c| c.id)
            .collect()
    }

    pub fn set_component_label(&mut self, id: ID, label: &str) -> bool {
        match self.components.get_mut(&id) {
            Some(c) => {
                c.label = label.to_string();
                true
            }
            None => false,
        }
    }

    pub fn update_component_position(&mut self, id: ID, position: Position) -> bool {
        match self.components.get_mut(&id) {
            Some(c) => {
                c.position = position;
                true
            }
            None => false,
        }
    }

    /// Swaps the kind of a component for one with the same pin layout.
    pub fn set_component_kind(&mut self, id: ID, kind: CompKind) -> Result<(), String> {
        let res = self.change_component_kind(id, kind);
        if let Err(e) = &res {
            warn!("kind change ignored: {}", e);
        }
        res
    }

    fn change_component_kind(&mut self, id: ID, kind: CompKind) -> Result<(), String> {
        let comp = self
            .components
            .get_mut(&id)
            .ok_or_else(|| format!("No component with id {}", id))?;
        if comp.kind.is_input() != kind.is_input() {
            return Err(format!("Can't turn {} into {}", comp.kind, kind));
        }
        comp.change_kind(kind)?;
        debug!("{} is now {}", comp.label, kind);
        Ok(())
    }

    /// Wires output pin `from_pin` of `from` to input pin `to_pin` of `to`.
    pub fn connect(&mut self, from: ID, from_pin: PIN, to: ID, to_pin: PIN) -> Result<ID, String> {
        let emitter = self
            .components
            .get(&from)
            .ok_or_else(|| "Invalid emitter id".to_string())?;
        if from_pin >= emitter.output_arity() {
            return Err(format!(
                "{} has {} output pins, can't access {}",
                emitter.label,
                emitter.output_arity(),
                from_pin
            ));
        }
        let receiver = self
            .components
            .get(&to)
            .ok_or_else(|| "Invalid receiver id".to_string())?;
        if to_pin >= receiver.input_arity() {
            return Err(format!(
                "{} has {} input pins, can't access {}",
                receiver.label,
                receiver.input_arity(),
                to_pin
            ));
        }
        if let Some(existing) = self.drivers.get(&(to, to_pin)) {
            return Err(format!(
                "Pin {} of {} is already driven by connection {}",
                to_pin, receiver.label, existing
            ));
        }
        let id = self.new_id();
        self.connections.insert(
            id,
            Connection {
                id,
                from,
                from_pin,
                to,
                to_pin,
            },
        );
        self.drivers.insert((to, to_pin), id);
        debug!("connected {}:{} -> {}:{}", from, from_pin, to, to_pin);
        Ok(id)
    }

    /// Like [`Circuit::connect`] but silent: `None` when nothing was added.
    pub fn add_connection(&mut self, from: ID, from_pin: PIN, to: ID, to_pin: PIN) -> Option<ID> {
        match self.connect(from, from_pin, to, to_pin) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("connection ignored: {}", e);
                None
            }
        }
    }

    pub fn remove_connection(&mut self, id: ID) -> bool {
        match self.connections.remove(&id) {
            Some(conn) => {
                self.drivers.remove(&(conn.to, conn.to_pin));
                debug!("disconnected {}:{} -> {}:{}", conn.from, conn.from_pin, conn.to, conn.to_pin);
                true
            }
            None => {
                warn!("no connection with id {}, nothing removed", id);
                false
            }
        }
    }

    pub fn connection(&self, id: ID) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connections_of(&self, id: ID) -> Vec<&Connection> {
        self.connections.values().filter(|c| c.touches(id)).collect()
    }

    /// The connection driving input pin `pin` of `to`, if any.
    pub fn driver(&self, to: ID, pin: PIN) -> Option<&Connection> {
        self.drivers
            .get(&(to, pin))
            .and_then(|id| self.connections.get(id))
    }

    /// Only `INPUT` components accept a value; anything else is ignored.
    pub fn set_input_value(&mut self, id: ID, val: bool) -> bool {
        match self.components.get(&id) {
            Some(c) if c.kind.is_input() => {
                self.input_values.insert(id, val);
                true
            }
            _ => {
                warn!("{} is not an input, value ignored", id);
                false
            }
        }
    }

    /// Untoggled inputs read `false`.
    pub fn input_value(&self, id: ID) -> bool {
        self.input_values.get(&id).copied().unwrap_or(false)
    }

    pub fn toggle_input(&mut self, id: ID) -> bool {
        let val = !self.input_value(id);
        self.set_input_value(id, val)
    }

    /// Evaluation pass: replaces the output value map wholesale.
    pub fn evaluate(&mut self) -> &BTreeMap<ID, bool> {
        self.output_values = resolve_all(self);
        debug!("evaluated {} components", self.output_values.len());
        &self.output_values
    }

    pub fn output_values(&self) -> &BTreeMap<ID, bool> {
        &self.output_values
    }

    /// Last evaluated value of `id`; `None` if it was not part of the last pass.
    pub fn output_value(&self, id: ID) -> Option<bool> {
        self.output_values.get(&id).copied()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Entering simulate mode runs an evaluation pass.
    pub fn set_mode(&mut self, mode: Mode) {
        let entering = self.mode != Mode::Simulate && mode == Mode::Simulate;
        self.mode = mode;
        if entering {
            self.evaluate();
        }
    }

    /// Every assignment of the inputs, first input varying slowest, with the
    /// resolved value of every `OUTPUT`. No inputs gives an empty table.
    ///
    /// Live input and output values are the same afterwards as before.
    pub fn gen_truth_table(&mut self) -> TruthTable {
        let inps = self.inputs();
        let outs = self.outputs();
        let mut t = TruthTable::new(inps.clone(), outs.clone());
        if inps.is_empty() {
            return t;
        }
        debug!("truth table over {} inputs, {} outputs", inps.len(), outs.len());
        let mut staged = StagedValues::new(self);
        for assignment in bitwise_counter(inps.len()) {
            staged.input_values = inps.iter().copied().zip(assignment.iter().copied()).collect();
            let vals = staged.evaluate();
            let outputs = outs
                .iter()
                .map(|id| vals.get(id).copied().unwrap_or(false))
                .collect();
            t.rows.push(TruthRow {
                inputs: assignment,
                outputs,
            });
        }
        t
    }

    /// Column headers for [`TruthTable::to_table`].
    pub fn labels(&self, t: &TruthTable) -> Vec<String> {
        t.inputs
            .iter()
            .chain(t.outputs.iter())
            .map(|id| match self.components.get(id) {
                Some(c) => c.label.clone(),
                None => id.to_string(),
            })
            .collect()
    }

    /// Back to an empty circuit. Ids keep counting up so old ones are never handed out again.
    pub fn reset(&mut self) {
        self.components.clear();
        self.connections.clear();
        self.drivers.clear();
        self.input_values.clear();
        self.output_values.clear();
        self.mode = Mode::Edit;
        debug!("circuit reset");
    }
}

// Value maps staged for the duration of a truth table run. Whatever
// happens while staged, dropping this puts the live maps back.
struct StagedValues<'a> {
    ckt: &'a mut Circuit,
    saved_inputs: HashMap<ID, bool>,
    saved_outputs: BTreeMap<ID, bool>,
}

impl<'a> StagedValues<'a> {
    fn new(ckt: &'a mut Circuit) -> StagedValues<'a> {
        let saved_inputs = ckt.input_values.clone();
        let saved_outputs = ckt.output_values.clone();
        StagedValues {
            ckt,
            saved_inputs,
            saved_outputs,
        }
    }
}

impl Deref for StagedValues<'_> {
    type Target = Circuit;
    fn deref(&self) -> &Circuit {
        self.ckt
    }
}

impl DerefMut for StagedValues<'_> {
    fn deref_mut(&mut self) -> &mut Circuit {
        self.ckt
    }
}

impl Drop for StagedValues<'_> {
    fn drop(&mut self) {
        self.ckt.input_values = mem::take(&mut self.saved_inputs);
        self.ckt.output_values = mem::take(&mut self.saved_outputs);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Circuit;
    use crate::types::{CompKind, Mode, Position};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn ids_are_never_reused() {
        let mut c = Circuit::new();
        let a = c.add_component(CompKind::And);
        c.remove_component(a);
        let b = c.add_component(CompKind::And);
        assert!(b > a);
        c.reset();
        let d = c.add_component(CompKind::Input);
        assert!(d > b);
    }

    #[test]
    fn cascade_delete() {
        init();
        let mut c = Circuit::new();
        let i = c.add_component(CompKind::Input);
        let g = c.add_component(CompKind::Not);
        let o = c.add_component(CompKind::Output);
        let o2 = c.add_component(CompKind::OutputLed);
        c.add_connection(i, 0, g, 0).unwrap();
        c.add_connection(g, 0, o, 0).unwrap();
        c.add_connection(g, 0, o2, 0).unwrap();
        assert_eq!(c.connections().count(), 3);
        assert!(c.remove_component(g));
        assert_eq!(c.connections().count(), 0);
        assert!(c.connections_of(i).is_empty());
        assert!(c.driver(o, 0).is_none());
        // the freed pin can be driven again
        assert!(c.add_connection(i, 0, o, 0).is_some());
    }

    #[test]
    fn removing_unknown_ids_is_a_no_op() {
        init();
        let mut c = Circuit::new();
        let i = c.add_component(CompKind::Input);
        assert!(!c.remove_component(99));
        assert!(!c.remove_connection(99));
        assert_eq!(c.components().count(), 1);
        assert_eq!(c.component(i).unwrap().kind, CompKind::Input);
    }

    #[test]
    fn one_driver_per_pin() {
        init();
        let mut c = Circuit::new();
        let a = c.add_component(CompKind::Input);
        let b = c.add_component(CompKind::Input);
        let g = c.add_component(CompKind::Or);
        let first = c.add_connection(a, 0, g, 0).unwrap();
        let before = c.connections().cloned().collect::<Vec<_>>();
        assert_eq!(c.add_connection(b, 0, g, 0), None);
        assert_eq!(c.connections().cloned().collect::<Vec<_>>(), before);
        assert_eq!(c.driver(g, 0).unwrap().id, first);
        assert!(c.connect(b, 0, g, 0).is_err());
        assert!(c.add_connection(b, 0, g, 1).is_some());
    }

    #[test]
    fn bad_endpoints_rejected() {
        let mut c = Circuit::new();
        let i = c.add_component(CompKind::Input);
        let o = c.add_component(CompKind::Output);
        let n = c.add_component(CompKind::Not);
        assert!(c.connect(i, 0, n, 1).is_err());
        assert!(c.connect(i, 1, n, 0).is_err());
        assert!(c.connect(o, 0, n, 0).is_err()); // sinks have no output pin
        assert!(c.connect(n, 0, i, 0).is_err()); // inputs have no input pin
        assert!(c.connect(77, 0, n, 0).is_err());
        assert!(c.connect(i, 0, 77, 0).is_err());
        assert_eq!(c.connections().count(), 0);
    }

    #[test]
    fn self_loop_is_allowed_structurally() {
        let mut c = Circuit::new();
        let g = c.add_component(CompKind::Or);
        assert!(c.add_connection(g, 0, g, 0).is_some());
        assert_eq!(c.evaluate()[&g], false);
    }

    #[test]
    fn input_values_default_false() {
        let mut c = Circuit::new();
        let i = c.add_component(CompKind::Input);
        let g = c.add_component(CompKind::And);
        assert!(!c.input_value(i));
        assert!(c.set_input_value(i, true));
        assert!(c.input_value(i));
        assert!(!c.set_input_value(g, true));
        assert!(!c.input_value(g));
        assert!(c.toggle_input(i));
        assert!(!c.input_value(i));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut c = Circuit::new();
        let a = c.add_component(CompKind::Input);
        let b = c.add_component(CompKind::Input);
        let x = c.add_component(CompKind::Nand);
        let o = c.add_component(CompKind::Output);
        c.add_connection(a, 0, x, 0).unwrap();
        c.add_connection(b, 0, x, 1).unwrap();
        c.add_connection(x, 0, o, 0).unwrap();
        c.set_input_value(a, true);
        let first = c.evaluate().clone();
        let second = c.evaluate().clone();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn outputs_are_stale_until_evaluated() {
        let mut c = Circuit::new();
        let i = c.add_component(CompKind::Input);
        let o = c.add_component(CompKind::Output);
        c.add_connection(i, 0, o, 0).unwrap();
        assert_eq!(c.output_value(o), None);
        c.evaluate();
        c.set_input_value(i, true);
        assert_eq!(c.output_value(o), Some(false));
        c.evaluate();
        assert_eq!(c.output_value(o), Some(true));
        // removed components drop out on the next pass
        c.remove_component(o);
        c.evaluate();
        assert_eq!(c.output_value(o), None);
    }

    #[test]
    fn entering_simulate_evaluates() {
        let mut c = Circuit::new();
        let g = c.add_component(CompKind::Nor);
        assert_eq!(c.mode(), Mode::Edit);
        c.set_mode(Mode::Simulate);
        assert_eq!(c.output_value(g), Some(true));
    }

    #[test]
    fn kind_swap() {
        init();
        let mut c = Circuit::new();
        let i = c.add_component(CompKind::Input);
        let g = c.add_component(CompKind::And);
        let o = c.add_component(CompKind::Output);
        assert!(c.set_component_kind(g, CompKind::Xor).is_ok());
        assert!(c.set_component_kind(g, CompKind::Not).is_err());
        assert!(c.set_component_kind(o, CompKind::OutputLed).is_ok());
        assert!(c.set_component_kind(o, CompKind::Not).is_err());
        assert!(c.set_component_kind(i, CompKind::Or).is_err());
        assert!(c.set_component_kind(99, CompKind::Or).is_err());
        // rejected changes leave the component as it was
        assert_eq!(c.component(g).unwrap().kind, CompKind::Xor);
        assert_eq!(c.component(i).unwrap().kind, CompKind::Input);
    }

    #[test]
    fn metadata_does_not_affect_values() {
        let mut c = Circuit::new();
        let i = c.add_component_at(CompKind::Input, Position::new(10.0, 20.0));
        let o = c.add_component(CompKind::Output);
        c.add_connection(i, 0, o, 0).unwrap();
        c.set_input_value(i, true);
        let before = c.evaluate().clone();
        assert!(c.update_component_position(i, Position::new(-4.0, 3.5)));
        assert!(c.set_component_label(o, "F"));
        assert_eq!(c.component(i).unwrap().position, Position::new(-4.0, 3.5));
        assert_eq!(c.evaluate(), &before);
        assert!(!c.set_component_label(99, "nope"));
    }

    #[test]
    fn truth_table_restores_live_values() {
        init();
        let mut c = Circuit::new();
        let a = c.add_component(CompKind::Input);
        let b = c.add_component(CompKind::Input);
        let g = c.add_component(CompKind::And);
        let o = c.add_component(CompKind::Output);
        c.add_connection(a, 0, g, 0).unwrap();
        c.add_connection(b, 0, g, 1).unwrap();
        c.add_connection(g, 0, o, 0).unwrap();
        c.set_input_value(a, true);
        let outs = c.evaluate().clone();

        let t = c.gen_truth_table();
        assert_eq!(t.len(), 4);
        assert!(c.input_value(a));
        assert!(!c.input_value(b));
        assert_eq!(c.output_values(), &outs);
    }

    #[test]
    fn truth_table_layout() {
        let mut c = Circuit::new();
        let ins = (0..3)
            .map(|_| c.add_component(CompKind::Input))
            .collect::<Vec<_>>();
        let led = c.add_component(CompKind::OutputLed);
        let o = c.add_component(CompKind::Output);
        c.add_connection(ins[0], 0, o, 0).unwrap();
        c.add_connection(ins[0], 0, led, 0).unwrap();
        let t = c.gen_truth_table();
        assert_eq!(t.inputs, ins);
        assert_eq!(t.outputs, vec![o]);
        assert_eq!(t.len(), 8);
        assert_eq!(t.rows[0].inputs, vec![false; 3]);
        assert_eq!(t.rows[7].inputs, vec![true; 3]);
        assert_eq!(t.rows[1].inputs, vec![false, false, true]);
        // output follows the first (slowest) input
        for (i, row) in t.rows.iter().enumerate() {
            assert_eq!(row.outputs, vec![i >= 4]);
        }
    }

    #[test]
    fn no_inputs_no_rows() {
        let mut c = Circuit::new();
        c.add_component(CompKind::Output);
        let t = c.gen_truth_table();
        assert!(t.is_empty());
        assert_eq!(t.outputs.len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut c = Circuit::new();
        let i = c.add_component(CompKind::Input);
        let o = c.add_component(CompKind::Output);
        c.add_connection(i, 0, o, 0).unwrap();
        c.set_input_value(i, true);
        c.set_mode(Mode::Simulate);
        c.reset();
        assert_eq!(c.components().count(), 0);
        assert_eq!(c.connections().count(), 0);
        assert!(c.output_values().is_empty());
        assert!(!c.input_value(i));
        assert_eq!(c.mode(), Mode::Edit);
    }
}
