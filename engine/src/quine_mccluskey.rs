use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::debug;

use crate::{
    bootstrap::definition,
    table::{bit_char, TruthTable},
    types::CompKind,
};

const DONT_CARE: char = '_';

// (minterms covered, pattern over the inputs using '0' / '1' / DONT_CARE)
type Implicant = (Vec<usize>, Vec<char>);

/// Simplified expressions for every output column, in terms of `names`.
pub fn simplify_many(t: &TruthTable, names: &[&str]) -> Result<Vec<String>, String> {
    (0..t.outputs.len()).map(|out| simplify(t, out, names)).collect()
}

/// Sum of products for output column `out`, written with the AND, OR and NOT
/// gate symbols (`.`, `+`, `!`).
pub fn simplify(t: &TruthTable, out: usize, names: &[&str]) -> Result<String, String> {
    if out >= t.outputs.len() {
        return Err(format!("There are only {} outputs, can't access {}", t.outputs.len(), out));
    }
    if names.len() != t.inputs.len() {
        return Err(format!("{} names for {} inputs", names.len(), t.inputs.len()));
    }
    if let Some(i) = t
        .rows
        .iter()
        .position(|r| r.inputs.len() != t.inputs.len() || r.outputs.len() != t.outputs.len())
    {
        return Err(format!(
            "Row {} does not match the {} input / {} output columns",
            i,
            t.inputs.len(),
            t.outputs.len()
        ));
    }
    let minterms = t
        .rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.outputs[out])
        .map(|(i, _)| i)
        .collect::<Vec<usize>>();
    if minterms.is_empty() {
        return Ok("0".to_string());
    }
    if minterms.len() == t.rows.len() {
        return Ok("1".to_string());
    }

    let primes = prime_implicants(grp_by_ones(t, out));
    let cover = select_cover(&primes, &minterms);
    debug!(
        "{} minterms, {} prime implicants, {} in cover",
        minterms.len(),
        primes.len(),
        cover.len()
    );

    let not = definition(CompKind::Not).symbol;
    let and = definition(CompKind::And).symbol;
    let or = definition(CompKind::Or).symbol;
    let mut terms = cover
        .iter()
        .map(|imp| {
            imp.1
                .iter()
                .zip(names.iter())
                .filter(|(v, _)| **v != DONT_CARE)
                .map(|(v, n)| format!("{}{}", if *v == '0' { not } else { "" }, n))
                .collect::<Vec<String>>()
                .join(and)
        })
        .collect::<Vec<String>>();
    terms.sort();
    Ok(terms.join(or))
}

fn prime_implicants(mut grp: BTreeMap<usize, Vec<Implicant>>) -> Vec<Implicant> {
    let mut primes = Vec::<Implicant>::new();
    loop {
        let mut nxt_grp_table: BTreeMap<usize, Vec<Implicant>> = BTreeMap::new();
        let mut paired = HashSet::<(usize, usize)>::new();

        for (curr_grp_no, curr_grp_rows) in &grp {
            // only the adjacent group (one more 1) can differ by a single bit
            let nxt = match grp.get(&(curr_grp_no + 1)) {
                Some(rows) => rows,
                None => continue,
            };
            for (i, a) in curr_grp_rows.iter().enumerate() {
                for (j, b) in nxt.iter().enumerate() {
                    if !differ_by_one_entry(&a.1, &b.1) {
                        continue;
                    }
                    let mut minterms = a.0.iter().chain(b.0.iter()).copied().collect::<Vec<usize>>();
                    minterms.sort();
                    minterms.dedup();
                    let merged = (minterms, collate_rows(&a.1, &b.1));
                    let entry = nxt_grp_table.entry(*curr_grp_no).or_default();
                    if !entry.iter().any(|e| e.1 == merged.1) {
                        entry.push(merged);
                    }
                    paired.insert((*curr_grp_no, i));
                    paired.insert((curr_grp_no + 1, j));
                }
            }
        }

        for (g_no, rows) in &grp {
            for (i, row) in rows.iter().enumerate() {
                if !paired.contains(&(*g_no, i)) && !primes.iter().any(|p| p.1 == row.1) {
                    primes.push(row.clone());
                }
            }
        }
        if nxt_grp_table.is_empty() {
            break;
        }
        grp = nxt_grp_table;
    }
    primes
}

// essential prime implicants first, then greedily whatever covers the most
// remaining minterms
fn select_cover<'a>(primes: &'a [Implicant], minterms: &[usize]) -> Vec<&'a Implicant> {
    let mut uncovered = minterms.iter().copied().collect::<BTreeSet<usize>>();
    let mut chosen = Vec::<usize>::new();

    for m in minterms {
        let covering = primes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.0.contains(m))
            .map(|(i, _)| i)
            .collect::<Vec<usize>>();
        if covering.len() == 1 && !chosen.contains(&covering[0]) {
            chosen.push(covering[0]);
        }
    }
    for i in &chosen {
        for m in &primes[*i].0 {
            uncovered.remove(m);
        }
    }
    while !uncovered.is_empty() {
        let best = primes
            .iter()
            .enumerate()
            .filter(|(i, _)| !chosen.contains(i))
            .max_by_key(|(i, p)| (p.0.iter().filter(|m| uncovered.contains(*m)).count(), usize::MAX - i));
        match best {
            Some((i, p)) => {
                for m in &p.0 {
                    uncovered.remove(m);
                }
                chosen.push(i);
            }
            None => break,
        }
    }
    chosen.iter().map(|i| &primes[*i]).collect()
}

fn differ_by_one_entry(a: &[char], b: &[char]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).filter(|(x, y)| x != y).count() == 1
}

fn collate_rows(a: &[char], b: &[char]) -> Vec<char> {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| if x == y { *x } else { DONT_CARE })
        .collect()
}

fn grp_by_ones(t: &TruthTable, out: usize) -> BTreeMap<usize, Vec<Implicant>> {
    let mut grps = BTreeMap::<usize, Vec<Implicant>>::new();
    // each row where the output is 1 goes in the group for its number of 1 inputs
    for (i, row) in t.rows.iter().enumerate() {
        if !row.outputs[out] {
            continue;
        }
        let num_ones = row.inputs.iter().filter(|v| **v).count();
        let irow = row.inputs.iter().map(|v| bit_char(*v)).collect();
        grps.entry(num_ones).or_default().push((vec![i], irow));
    }
    grps
}
