use crate::production::{Production, Terminal};
use crate::ProdId;
use parser::ast::UnitId;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Standard LL(1) nullable fixed point (spec §4.8). `ChildGrammar` is
/// transparent: its nullability is its referenced unit's start production's
/// nullability, since both live in the same shared arena.
pub(crate) fn nullable_set(productions: &[Production], starts: &BTreeMap<UnitId, ProdId>) -> BTreeSet<ProdId> {
    let mut nullable = BTreeSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for (i, p) in productions.iter().enumerate() {
            let id = ProdId::from_index(i);
            if nullable.contains(&id) {
                continue;
            }
            let is_nullable = match p {
                Production::Epsilon => true,
                Production::Literal { .. } | Production::Variable { .. } => false,
                Production::Sequence { children, .. } => children.iter().all(|c| nullable.contains(c)),
                Production::LookAhead { a, b, .. } => nullable.contains(a) || nullable.contains(b),
                Production::Switch { cases, default, .. } => {
                    cases.iter().any(|(_, c)| nullable.contains(c)) || default.is_some_and(|d| nullable.contains(&d))
                }
                Production::ChildGrammar { unit, .. } => starts.get(unit).is_some_and(|s| nullable.contains(s)),
            };
            if is_nullable {
                nullable.insert(id);
                changed = true;
            }
        }
    }
    nullable
}

/// `FIRST(Sequence P1…Pn) = FIRST(P1) ∪ FIRST(P2)\{ε} ∪ … up to the first
/// non-nullable Pi` (spec §4.8). Computed to a fixed point since `FIRST` of
/// a later production can still be growing on an earlier sweep.
pub(crate) fn first_sets(
    productions: &[Production],
    starts: &BTreeMap<UnitId, ProdId>,
    nullable: &BTreeSet<ProdId>,
) -> BTreeMap<ProdId, BTreeSet<Terminal>> {
    let mut first: BTreeMap<ProdId, BTreeSet<Terminal>> = BTreeMap::new();
    let mut changed = true;
    while changed {
        changed = false;
        for (i, p) in productions.iter().enumerate() {
            let id = ProdId::from_index(i);
            let mut set = first.get(&id).cloned().unwrap_or_default();
            let before = set.len();

            match p {
                Production::Epsilon => {}
                Production::Literal { .. } | Production::Variable { .. } => {
                    set.insert(Terminal::Node(id));
                }
                Production::Sequence { children, .. } => {
                    for &child in children {
                        if let Some(child_first) = first.get(&child) {
                            set.extend(child_first.iter().copied());
                        }
                        if !nullable.contains(&child) {
                            break;
                        }
                    }
                }
                Production::LookAhead { a, b, .. } => {
                    if let Some(s) = first.get(a) {
                        set.extend(s.iter().copied());
                    }
                    if let Some(s) = first.get(b) {
                        set.extend(s.iter().copied());
                    }
                }
                Production::Switch { cases, default, .. } => {
                    for (_, c) in cases {
                        if let Some(s) = first.get(c) {
                            set.extend(s.iter().copied());
                        }
                    }
                    if let Some(d) = default {
                        if let Some(s) = first.get(d) {
                            set.extend(s.iter().copied());
                        }
                    }
                }
                Production::ChildGrammar { unit, .. } => {
                    if let Some(s) = starts.get(unit).and_then(|start| first.get(start)) {
                        set.extend(s.iter().copied());
                    }
                }
            }

            changed |= set.len() != before;
            first.insert(id, set);
        }
    }
    first
}

/// `FOLLOW(start) = {$}`; propagated through sequences, lookaheads,
/// switches, and embedded units exactly as described in spec §4.8.
pub(crate) fn follow_sets(
    productions: &[Production],
    starts: &BTreeMap<UnitId, ProdId>,
    nullable: &BTreeSet<ProdId>,
    first: &BTreeMap<ProdId, BTreeSet<Terminal>>,
) -> BTreeMap<ProdId, BTreeSet<Terminal>> {
    let mut follow: BTreeMap<ProdId, BTreeSet<Terminal>> = BTreeMap::new();
    for &start in starts.values() {
        follow.entry(start).or_default().insert(Terminal::EndOfInput);
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (i, p) in productions.iter().enumerate() {
            let id = ProdId::from_index(i);
            let this_follow = follow.get(&id).cloned().unwrap_or_default();

            match p {
                Production::Sequence { children, .. } => {
                    for pos in 0..children.len() {
                        let mut addition = BTreeSet::new();
                        let mut suffix_nullable = true;
                        for &next in &children[pos + 1..] {
                            if let Some(f) = first.get(&next) {
                                addition.extend(f.iter().copied());
                            }
                            if !nullable.contains(&next) {
                                suffix_nullable = false;
                                break;
                            }
                        }
                        if suffix_nullable {
                            addition.extend(this_follow.iter().copied());
                        }
                        changed |= extend_follow(&mut follow, children[pos], addition);
                    }
                }
                Production::LookAhead { a, b, .. } => {
                    changed |= extend_follow(&mut follow, *a, this_follow.clone());
                    changed |= extend_follow(&mut follow, *b, this_follow);
                }
                Production::Switch { cases, default, .. } => {
                    for (_, c) in cases {
                        changed |= extend_follow(&mut follow, *c, this_follow.clone());
                    }
                    if let Some(d) = default {
                        changed |= extend_follow(&mut follow, *d, this_follow);
                    }
                }
                Production::ChildGrammar { unit, .. } => {
                    if let Some(&child_start) = starts.get(unit) {
                        changed |= extend_follow(&mut follow, child_start, this_follow);
                    }
                }
                Production::Epsilon | Production::Literal { .. } | Production::Variable { .. } => {}
            }
        }
    }
    follow
}

fn extend_follow(follow: &mut BTreeMap<ProdId, BTreeSet<Terminal>>, id: ProdId, addition: BTreeSet<Terminal>) -> bool {
    let entry = follow.entry(id).or_default();
    let before = entry.len();
    entry.extend(addition);
    entry.len() != before
}

/// `la(a)`/`la(b)` per `LookAhead` node (spec §4.8 "Lookahead table").
pub(crate) fn lookahead_sets(
    productions: &[Production],
    nullable: &BTreeSet<ProdId>,
    first: &BTreeMap<ProdId, BTreeSet<Terminal>>,
    follow: &BTreeMap<ProdId, BTreeSet<Terminal>>,
) -> BTreeMap<ProdId, (BTreeSet<Terminal>, BTreeSet<Terminal>)> {
    let mut table = BTreeMap::new();
    for (i, p) in productions.iter().enumerate() {
        if let Production::LookAhead { a, b, .. } = p {
            let id = ProdId::from_index(i);
            let mut la_a = first.get(a).cloned().unwrap_or_default();
            if nullable.contains(a) {
                la_a.extend(follow.get(&id).cloned().unwrap_or_default());
            }
            let mut la_b = first.get(b).cloned().unwrap_or_default();
            if nullable.contains(b) {
                la_b.extend(follow.get(&id).cloned().unwrap_or_default());
            }
            table.insert(id, (la_a, la_b));
        }
    }
    table
}

/// Every production reachable from `start`, including `start` itself — used
/// to scope ambiguity/left-recursion checks to one unit even though all
/// units share one production arena.
pub(crate) fn reachable(start: ProdId, productions: &[Production]) -> BTreeSet<ProdId> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        stack.extend(productions[id.index()].children());
    }
    seen
}

/// `la(a) ∩ la(b)` must be empty for every `LookAhead` reachable from one
/// unit's start, else that alternative is ambiguous (spec §4.8).
pub(crate) fn check_ambiguity_within(
    productions: &[Production],
    lookahead: &BTreeMap<ProdId, (BTreeSet<Terminal>, BTreeSet<Terminal>)>,
    scope: &BTreeSet<ProdId>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (&id, (la_a, la_b)) in lookahead {
        if !scope.contains(&id) {
            continue;
        }
        if la_a.intersection(la_b).next().is_some() {
            let label = productions[id.index()].label();
            errors.push(format!("ambiguous alternation at '{label}': lookahead sets overlap"));
        }
    }
    errors
}

/// Walks the derivation graph starting at `start`, following only the
/// left edges a top-down parser would actually consult — the first child of
/// a sequence, then later children only while every earlier one is nullable
/// (spec §4.8: "a symbol reaching itself through only nullable prefixes").
/// A node revisited while still on the current path is left-recursive.
pub(crate) fn detect_left_recursion(
    start: ProdId,
    productions: &[Production],
    starts: &BTreeMap<UnitId, ProdId>,
    nullable: &BTreeSet<ProdId>,
) -> Vec<String> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    let mut done = BTreeSet::new();
    walk(start, productions, starts, nullable, &mut path, &mut done, &mut errors);
    errors
}

fn walk(
    id: ProdId,
    productions: &[Production],
    starts: &BTreeMap<UnitId, ProdId>,
    nullable: &BTreeSet<ProdId>,
    path: &mut Vec<ProdId>,
    done: &mut BTreeSet<ProdId>,
    errors: &mut Vec<String>,
) {
    if path.contains(&id) {
        errors.push(format!("left recursion detected at '{}'", productions[id.index()].label()));
        return;
    }
    if done.contains(&id) {
        return;
    }
    path.push(id);
    for child in left_edges(&productions[id.index()], nullable, starts) {
        walk(child, productions, starts, nullable, path, done, errors);
    }
    path.pop();
    done.insert(id);
}

fn left_edges(p: &Production, nullable: &BTreeSet<ProdId>, starts: &BTreeMap<UnitId, ProdId>) -> Vec<ProdId> {
    match p {
        Production::Epsilon | Production::Literal { .. } | Production::Variable { .. } => Vec::new(),
        Production::Sequence { children, .. } => {
            let mut out = Vec::new();
            for &c in children {
                out.push(c);
                if !nullable.contains(&c) {
                    break;
                }
            }
            out
        }
        Production::LookAhead { a, b, .. } => vec![*a, *b],
        Production::Switch { cases, default, .. } => {
            let mut out: Vec<ProdId> = cases.iter().map(|(_, c)| *c).collect();
            out.extend(default.iter().copied());
            out
        }
        Production::ChildGrammar { unit, .. } => starts.get(unit).into_iter().copied().collect(),
    }
}
