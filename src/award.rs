use crate::models::problem::ProblemSet;
use crate::models::team::TeamId;
use std::collections::{BTreeMap, HashSet};

/// An accepted (`OK`) submission as seen by the award calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solve {
    pub team: TeamId,
    pub problem_ordinal: usize,
    pub relative_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Everyone,
    Only(HashSet<TeamId>),
}

impl Eligibility {
    pub fn allows(&self, team: TeamId) -> bool {
        match self {
            Eligibility::Everyone => true,
            Eligibility::Only(teams) => teams.contains(&team),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    pub problem_ordinal: usize,
    pub label: String,
    pub citation: String,
    pub team_ids: Vec<TeamId>,
}

impl Award {
    pub fn feed_id(&self) -> String {
        format!("first-to-solve-{}", self.label)
    }
}

struct FirstSolve {
    time: i64,
    teams: Vec<TeamId>,
}

/// Teams tied for the earliest accepted submission of each problem, among eligible teams.
pub fn first_to_solve(solves: &[Solve], eligible: &Eligibility, problems: &ProblemSet) -> Vec<Award> {
    let mut ordered: Vec<&Solve> = solves
        .iter()
        .filter(|solve| eligible.allows(solve.team))
        .collect();
    ordered.sort_by_key(|solve| solve.relative_time);

    let mut firsts: BTreeMap<usize, FirstSolve> = BTreeMap::new();
    let mut seen: HashSet<(usize, TeamId)> = HashSet::new();
    for solve in ordered {
        if !seen.insert((solve.problem_ordinal, solve.team)) {
            continue;
        }
        let first = firsts
            .entry(solve.problem_ordinal)
            .or_insert_with(|| FirstSolve {
                time: solve.relative_time,
                teams: Vec::new(),
            });
        if solve.relative_time < first.time {
            first.time = solve.relative_time;
            first.teams = vec![solve.team];
        } else if solve.relative_time == first.time {
            first.teams.push(solve.team);
        }
    }

    firsts
        .into_iter()
        .filter_map(|(ordinal, first)| {
            let problem = problems.by_ordinal(ordinal)?;
            Some(Award {
                problem_ordinal: ordinal,
                label: problem.code.clone(),
                citation: format!("First to solve problem {}", problem.code),
                team_ids: first.teams,
            })
        })
        .collect()
}
