use crate::import_codeforces;
use log::warn;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub code: String,
    pub name: String,
    /// 1-based position in the standings.
    pub ordinal: usize,
}

impl Problem {
    pub fn feed_id(&self) -> String {
        self.ordinal.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProblemSet {
    problems: Vec<Problem>,
    by_code: HashMap<String, usize>,
}

impl ProblemSet {
    /// Ordinals follow first appearance; a repeated index keeps its first declaration.
    pub fn from_standings(problems: &[import_codeforces::Problem]) -> ProblemSet {
        let mut set = ProblemSet::default();
        for problem in problems {
            if set.by_code.contains_key(&problem.index) {
                warn!("Problem {} declared twice, keeping the first", problem.index);
                continue;
            }
            let ordinal = set.problems.len() + 1;
            set.by_code.insert(problem.index.clone(), ordinal - 1);
            set.problems.push(Problem {
                code: problem.index.clone(),
                name: problem.name.clone(),
                ordinal,
            });
        }
        set
    }

    pub fn get(&self, code: &str) -> Option<&Problem> {
        self.by_code.get(code).map(|&i| &self.problems[i])
    }

    pub fn by_ordinal(&self, ordinal: usize) -> Option<&Problem> {
        ordinal.checked_sub(1).and_then(|i| self.problems.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
