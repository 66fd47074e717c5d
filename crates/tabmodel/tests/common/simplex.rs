//! Dense two-phase simplex, standing in for an external solver.

const EPS: f64 = 1e-9;
const FEASIBILITY_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl Sense {
    fn flipped(self) -> Self {
        match self {
            Sense::Le => Sense::Ge,
            Sense::Ge => Sense::Le,
            Sense::Eq => Sense::Eq,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub coefficients: Vec<f64>,
    pub sense: Sense,
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Optimal { x: Vec<f64>, objective: f64 },
    Infeasible,
    Unbounded,
}

struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    width: usize,
}

impl Tableau {
    fn reduced_cost(&self, cost: &[f64], column: usize) -> f64 {
        let priced: f64 = self
            .rows
            .iter()
            .zip(&self.basis)
            .map(|(row, &basic)| cost[basic] * row[column])
            .sum();
        cost[column] - priced
    }

    fn pivot(&mut self, row: usize, column: usize) {
        let pivot = self.rows[row][column];
        for value in &mut self.rows[row] {
            *value /= pivot;
        }
        let pivot_row = self.rows[row].clone();
        for (idx, other) in self.rows.iter_mut().enumerate() {
            let factor = other[column];
            if idx == row || factor == 0.0 {
                continue;
            }
            for (value, p) in other.iter_mut().zip(&pivot_row) {
                *value -= factor * p;
            }
        }
        self.basis[row] = column;
    }

    /// Returns `false` when the objective is unbounded below.
    fn run(&mut self, cost: &[f64], allowed: impl Fn(usize) -> bool) -> bool {
        loop {
            let entering = (0..self.width).find(|&column| {
                allowed(column)
                    && !self.basis.contains(&column)
                    && self.reduced_cost(cost, column) < -EPS
            });
            let Some(entering) = entering else {
                return true;
            };

            let mut leaving: Option<(usize, f64)> = None;
            for (idx, row) in self.rows.iter().enumerate() {
                if row[entering] <= EPS {
                    continue;
                }
                let ratio = row[self.width] / row[entering];
                let better = match leaving {
                    None => true,
                    Some((current, best)) => {
                        ratio < best - EPS
                            || ((ratio - best).abs() <= EPS
                                && self.basis[idx] < self.basis[current])
                    }
                };
                if better {
                    leaving = Some((idx, ratio));
                }
            }
            let Some((leaving, _)) = leaving else {
                return false;
            };
            self.pivot(leaving, entering);
        }
    }
}

/// Minimize `cost · x` subject to `constraints` and `x >= 0`.
pub fn solve(cost: &[f64], constraints: &[Constraint]) -> Outcome {
    let n = cost.len();
    let normalized: Vec<Constraint> = constraints
        .iter()
        .map(|constraint| {
            if constraint.rhs < 0.0 {
                Constraint {
                    coefficients: constraint.coefficients.iter().map(|a| -a).collect(),
                    sense: constraint.sense.flipped(),
                    rhs: -constraint.rhs,
                }
            } else {
                constraint.clone()
            }
        })
        .collect();

    let slacks = normalized.iter().filter(|c| c.sense != Sense::Eq).count();
    let artificials = normalized.iter().filter(|c| c.sense != Sense::Le).count();
    let width = n + slacks + artificials;

    let mut tableau = Tableau {
        rows: Vec::with_capacity(normalized.len()),
        basis: Vec::with_capacity(normalized.len()),
        width,
    };
    let mut next_slack = n;
    let mut next_artificial = n + slacks;
    for constraint in &normalized {
        let mut row = vec![0.0; width + 1];
        row[..n].copy_from_slice(&constraint.coefficients);
        row[width] = constraint.rhs;
        match constraint.sense {
            Sense::Le => {
                row[next_slack] = 1.0;
                tableau.basis.push(next_slack);
                next_slack += 1;
            }
            Sense::Ge => {
                row[next_slack] = -1.0;
                next_slack += 1;
                row[next_artificial] = 1.0;
                tableau.basis.push(next_artificial);
                next_artificial += 1;
            }
            Sense::Eq => {
                row[next_artificial] = 1.0;
                tableau.basis.push(next_artificial);
                next_artificial += 1;
            }
        }
        tableau.rows.push(row);
    }

    let is_artificial = |column: usize| column >= n + slacks;
    let phase_one: Vec<f64> = (0..width)
        .map(|column| if is_artificial(column) { 1.0 } else { 0.0 })
        .collect();
    tableau.run(&phase_one, |_| true);

    let infeasibility: f64 = tableau
        .rows
        .iter()
        .zip(&tableau.basis)
        .filter(|&(_, &basic)| is_artificial(basic))
        .map(|(row, _)| row[width])
        .sum();
    if infeasibility > FEASIBILITY_TOLERANCE {
        return Outcome::Infeasible;
    }

    for row in 0..tableau.rows.len() {
        if !is_artificial(tableau.basis[row]) {
            continue;
        }
        let replacement = (0..n + slacks).find(|&column| {
            tableau.rows[row][column].abs() > EPS && !tableau.basis.contains(&column)
        });
        if let Some(column) = replacement {
            tableau.pivot(row, column);
        }
    }

    let mut phase_two = cost.to_vec();
    phase_two.resize(width, 0.0);
    if !tableau.run(&phase_two, |column| !is_artificial(column)) {
        return Outcome::Unbounded;
    }

    let mut x = vec![0.0; n];
    for (row, &basic) in tableau.rows.iter().zip(&tableau.basis) {
        if basic < n {
            x[basic] = row[width];
        }
    }
    for value in &mut x {
        if value.abs() < EPS {
            *value = 0.0;
        }
    }
    let objective: f64 = cost.iter().zip(&x).map(|(c, v)| c * v).sum();
    Outcome::Optimal { x, objective }
}

#[test]
fn solves_a_small_mixed_program() {
    let outcome = solve(
        &[1.0, 1.0],
        &[
            Constraint {
                coefficients: vec![1.0, 2.0],
                sense: Sense::Ge,
                rhs: 4.0,
            },
            Constraint {
                coefficients: vec![1.0, 0.0],
                sense: Sense::Le,
                rhs: 3.0,
            },
        ],
    );
    assert_eq!(
        outcome,
        Outcome::Optimal {
            x: vec![0.0, 2.0],
            objective: 2.0
        }
    );
}
