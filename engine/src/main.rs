use csim_engine::{
    quine_mccluskey::simplify_many,
    types::{CompKind, Mode},
    Circuit,
};
use log::{error, info};

// F1 = A.B + !A.C, F2 = A ^ B
fn sample_comb_ckt() -> Circuit {
    let mut c = Circuit::new();
    let a = c.add_component(CompKind::Input);
    let b = c.add_component(CompKind::Input);
    let i3 = c.add_component(CompKind::Input);
    c.set_component_label(a, "A");
    c.set_component_label(b, "B");
    c.set_component_label(i3, "C");

    let not = c.add_component(CompKind::Not);
    let a1 = c.add_component(CompKind::And);
    let a2 = c.add_component(CompKind::And);
    let or = c.add_component(CompKind::Or);
    let xor = c.add_component(CompKind::Xor);
    let f1 = c.add_component(CompKind::Output);
    let f2 = c.add_component(CompKind::Output);
    c.set_component_label(f1, "F1");
    c.set_component_label(f2, "F2");

    c.add_connection(a, 0, not, 0);
    c.add_connection(a, 0, a1, 0);
    c.add_connection(b, 0, a1, 1);
    c.add_connection(not, 0, a2, 0);
    c.add_connection(i3, 0, a2, 1);
    c.add_connection(a1, 0, or, 0);
    c.add_connection(a2, 0, or, 1);
    c.add_connection(or, 0, f1, 0);
    c.add_connection(a, 0, xor, 0);
    c.add_connection(b, 0, xor, 1);
    c.add_connection(xor, 0, f2, 0);
    c
}

fn main() {
    let _ = env_logger::builder().try_init();

    let mut c = sample_comb_ckt();
    c.set_mode(Mode::Simulate);
    for comp in c.components() {
        if let Some(v) = c.output_value(comp.id) {
            info!("{} = {}", comp.label, v);
        }
    }

    let t = c.gen_truth_table();
    match t.to_table(c.labels(&t)) {
        Ok(table) => println!("{}", table),
        Err(e) => error!("{}", e),
    }

    let labels = c.labels(&t);
    let names = labels[..t.inputs.len()]
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<&str>>();
    match simplify_many(&t, &names) {
        Ok(exprs) => {
            for (out, expr) in labels[t.inputs.len()..].iter().zip(exprs) {
                println!("{} = {}", out, expr);
            }
        }
        Err(e) => error!("{}", e),
    }
}
