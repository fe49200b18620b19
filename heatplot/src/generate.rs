//! Random equation generation
//!
//! Depth-bounded recursive construction for the random-search mode.  Every
//! negation wraps an explicit bracket group and constants stay small and
//! non-negative, so everything generated here renders to parseable text.
//! Whether a candidate is worth keeping is a separate question, answered by
//! [`FrameStats`](crate::plot::FrameStats) over its sampled frames.
use crate::builtins;
use crate::expr::{BinaryOp, Equation, Expr, Formula};
use rand::Rng;

/// Builds a random formula whose sides have depth at most `depth`
pub fn random_formula<R: Rng>(rng: &mut R, depth: usize) -> Formula {
    let lhs = random_expr(rng, depth);
    let rhs = random_expr(rng, depth);
    Formula::new(Equation::new(lhs, rhs))
}

fn random_expr<R: Rng>(rng: &mut R, depth: usize) -> Expr {
    if depth == 0 {
        return random_var(rng);
    }
    match rng.gen_range(0..11) {
        0 => Expr::constant(f64::from(rng.gen_range(0i32..400)) / 4.0),
        1 => random_var(rng),
        choice @ 2..=7 => {
            let op = [
                BinaryOp::Add,
                BinaryOp::Sub,
                BinaryOp::Mul,
                BinaryOp::Div,
                BinaryOp::Pow,
                BinaryOp::Mod,
            ][choice - 2];
            let lhs = random_expr(rng, depth - 1);
            let rhs = random_expr(rng, depth - 1);
            Expr::binary(op, lhs, rhs)
        }
        8 => Expr::negate(Expr::brackets(random_expr(rng, depth - 1))),
        9 => Expr::brackets(random_expr(rng, depth - 1)),
        10 => random_call(rng, depth - 1),
        _ => unreachable!(),
    }
}

fn random_var<R: Rng>(rng: &mut R) -> Expr {
    let letters = ['X', 'Y', 'T'];
    Expr::var(letters[rng.gen_range(0..letters.len())])
}

fn random_call<R: Rng>(rng: &mut R, depth: usize) -> Expr {
    let names = builtins::names();
    let name = names[rng.gen_range(0..names.len())];
    if builtins::single(name).is_some() {
        Expr::single(name, random_expr(rng, depth))
    } else {
        let lhs = random_expr(rng, depth);
        let rhs = random_expr(rng, depth);
        Expr::double(name, lhs, rhs, rng.gen_bool(0.5))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_formulas_render_parseable_text() {
        let mut rng = StdRng::seed_from_u64(0x6865_6174);
        for _ in 0..200 {
            let formula = random_formula(&mut rng, 6);
            let text = formula.to_string();
            let reparsed = Formula::parse(&text)
                .unwrap_or_else(|e| panic!("generated text {text:?} failed to parse: {e}"));
            assert_eq!(reparsed.to_string(), text);
        }
    }

    #[test]
    fn depth_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let formula = random_formula(&mut rng, 4);
            // a negation step adds two levels (negate + bracket), so a side
            // of budget 4 is at most 9 deep, plus the `=` node
            assert!(formula.depth() <= 2 * 4 + 2);
        }
    }

    #[test]
    fn zero_depth_degenerates_to_variables() {
        let mut rng = StdRng::seed_from_u64(7);
        let formula = random_formula(&mut rng, 0);
        assert_eq!(formula.depth(), 2);
    }
}
