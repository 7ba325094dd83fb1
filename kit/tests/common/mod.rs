//! A small expression grammar built state by state.
//!
//! ```text
//! prog : stat+ ;
//! stat : expr SEMI? ;
//! expr : atom (PLUS atom)* ;
//! atom : ID | INT | LPAREN expr RPAREN ;
//! ```
#![allow(dead_code)]

use atnkit::{Atn, AtnState, DecisionKind, GrammarType, Transition};

pub const ID: i32 = 1;
pub const INT: i32 = 2;
pub const PLUS: i32 = 3;
pub const SEMI: i32 = 4;
pub const LPAREN: i32 = 5;
pub const RPAREN: i32 = 6;

pub const VOCABULARY: &[&str] = &[
    "<INVALID>", "ID", "INT", "PLUS", "SEMI", "LPAREN", "RPAREN",
];

pub struct Calc {
    pub atn: Atn,
    /// `prog` calls `stat` here.
    pub prog_call: usize,
    /// `stat` calls `expr` here.
    pub stat_call: usize,
    /// `expr` calls its first `atom` here.
    pub expr_call: usize,
    /// `expr` calls the `atom` after `PLUS` here.
    pub expr_call_rhs: usize,
    /// `atom` calls `expr` between the parentheses here.
    pub atom_call: usize,
    /// Optional `SEMI` decision in `stat`.
    pub stat_semi: usize,
    /// `(PLUS atom)*` loop entry in `expr`.
    pub expr_loop: usize,
    /// Last state of `expr` before its stop state.
    pub expr_end: usize,
    /// End of every `atom` alternative.
    pub atom_end: usize,
    /// Just after `LPAREN expr`, before `RPAREN`.
    pub atom_rparen: usize,
}

fn rule(atn: &mut Atn, rule_index: usize) -> (usize, usize) {
    let start = atn.add_state(AtnState::rule_start(rule_index));
    let stop = atn.add_state(AtnState::rule_stop(rule_index));
    assert_eq!(atn.define_rule(start, stop).unwrap(), rule_index);
    (start, stop)
}

fn edge(atn: &mut Atn, from: usize, t: Transition) {
    atn.add_transition(from, t).unwrap();
}

pub fn calc() -> Calc {
    let mut atn = Atn::new(GrammarType::Parser, RPAREN);
    let (prog, prog_stop) = rule(&mut atn, 0);
    let (stat, stat_stop) = rule(&mut atn, 1);
    let (expr, expr_stop) = rule(&mut atn, 2);
    let (atom, atom_stop) = rule(&mut atn, 3);

    // prog : stat+ ;
    let prog_call = atn.add_state(AtnState::decision(DecisionKind::PlusBlockStart, 0));
    let prog_loop = atn.add_state(AtnState::decision(DecisionKind::PlusLoopBack, 0));
    let prog_end = atn.add_state(AtnState::basic(0));
    edge(&mut atn, prog, Transition::epsilon(prog_call));
    edge(&mut atn, prog_call, Transition::rule(stat, 1, prog_loop, 0));
    edge(&mut atn, prog_loop, Transition::epsilon(prog_call));
    edge(&mut atn, prog_loop, Transition::epsilon(prog_end));
    edge(&mut atn, prog_end, Transition::epsilon(prog_stop));

    // stat : expr SEMI? ;
    let stat_call = atn.add_state(AtnState::basic(1));
    let stat_semi = atn.add_state(AtnState::decision(DecisionKind::BasicBlockStart, 1));
    let stat_end = atn.add_state(AtnState::basic(1));
    edge(&mut atn, stat, Transition::epsilon(stat_call));
    edge(&mut atn, stat_call, Transition::rule(expr, 2, stat_semi, 0));
    edge(&mut atn, stat_semi, Transition::atom(stat_end, SEMI));
    edge(&mut atn, stat_semi, Transition::epsilon(stat_end));
    edge(&mut atn, stat_end, Transition::epsilon(stat_stop));

    // expr : atom (PLUS atom)* ;
    let expr_call = atn.add_state(AtnState::basic(2));
    let expr_loop = atn.add_state(AtnState::decision(DecisionKind::StarLoopEntry, 2));
    let expr_call_rhs = atn.add_state(AtnState::basic(2));
    let expr_end = atn.add_state(AtnState::basic(2));
    edge(&mut atn, expr, Transition::epsilon(expr_call));
    edge(&mut atn, expr_call, Transition::rule(atom, 3, expr_loop, 0));
    edge(&mut atn, expr_loop, Transition::atom(expr_call_rhs, PLUS));
    edge(&mut atn, expr_loop, Transition::epsilon(expr_end));
    edge(&mut atn, expr_call_rhs, Transition::rule(atom, 3, expr_loop, 0));
    edge(&mut atn, expr_end, Transition::epsilon(expr_stop));

    // atom : ID | INT | LPAREN expr RPAREN ;
    let atom_block = atn.add_state(AtnState::decision(DecisionKind::BasicBlockStart, 3));
    let atom_call = atn.add_state(AtnState::basic(3));
    let atom_rparen = atn.add_state(AtnState::basic(3));
    let atom_end = atn.add_state(AtnState::basic(3));
    edge(&mut atn, atom, Transition::epsilon(atom_block));
    edge(&mut atn, atom_block, Transition::atom(atom_end, ID));
    edge(&mut atn, atom_block, Transition::atom(atom_end, INT));
    edge(&mut atn, atom_block, Transition::atom(atom_call, LPAREN));
    edge(&mut atn, atom_call, Transition::rule(expr, 2, atom_rparen, 0));
    edge(&mut atn, atom_rparen, Transition::atom(atom_end, RPAREN));
    edge(&mut atn, atom_end, Transition::epsilon(atom_stop));

    for decision in [prog_call, prog_loop, stat_semi, expr_loop, atom_block] {
        atn.define_decision_state(decision).unwrap();
    }

    Calc {
        atn,
        prog_call,
        stat_call,
        expr_call,
        expr_call_rhs,
        atom_call,
        stat_semi,
        expr_loop,
        expr_end,
        atom_end,
        atom_rparen,
    }
}

/// `depth` rules, each calling the next and ending right after the call.
/// The innermost rule is `inner : ;`, so every continuation is empty.
///
/// Returns the ATN, the innermost rule's only non-boundary state and the
/// call sites from outermost to innermost.
pub fn tail_calls(depth: usize) -> (Atn, usize, Vec<usize>) {
    let mut atn = Atn::new(GrammarType::Parser, 1);
    let rules: Vec<(usize, usize)> = (0..=depth).map(|r| rule(&mut atn, r)).collect();

    let mut calls = Vec::with_capacity(depth);
    for r in 0..depth {
        let (start, stop) = rules[r];
        let call = atn.add_state(AtnState::basic(r));
        let after = atn.add_state(AtnState::basic(r));
        edge(&mut atn, start, Transition::epsilon(call));
        edge(&mut atn, call, Transition::rule(rules[r + 1].0, r + 1, after, 0));
        edge(&mut atn, after, Transition::epsilon(stop));
        calls.push(call);
    }

    let (start, stop) = rules[depth];
    let body = atn.add_state(AtnState::basic(depth));
    edge(&mut atn, start, Transition::epsilon(body));
    edge(&mut atn, body, Transition::epsilon(stop));

    (atn, body, calls)
}
