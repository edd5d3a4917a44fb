use std::fmt;
use std::str::FromStr;

use santa_types::{Participant, Roster};

use crate::Assignments;

/// How the candidate pool is narrowed before the random pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawStrategy {
    /// Any candidate may be picked. Late requesters can end up with nobody
    /// left even when a full matching would exist.
    #[default]
    Greedy,
    /// Skip candidates whose choice would leave the final giver with only
    /// themselves to give to. Every requester gets a recipient as long as
    /// the roster has at least two people.
    Lookahead,
}

impl DrawStrategy {
    pub(crate) fn narrow<'a>(
        self,
        requester: &Participant,
        roster: &Roster,
        existing: &Assignments,
        pool: Vec<&'a Participant>,
    ) -> Vec<&'a Participant> {
        match self {
            DrawStrategy::Greedy => pool,
            DrawStrategy::Lookahead => {
                let safe: Vec<&Participant> = pool
                    .iter()
                    .copied()
                    .filter(|c| !strands_last_giver(requester, c, roster, existing))
                    .collect();
                if safe.is_empty() { pool } else { safe }
            }
        }
    }
}

/// True if giving `requester -> candidate` leaves exactly one giver whose
/// only untaken recipient is themselves.
///
/// With n unassigned givers and n untaken recipients, a self-free perfect
/// matching exists for every n >= 2 (Hall's condition holds trivially), so
/// the only dead end is the n == 1 case checked here.
fn strands_last_giver(
    requester: &Participant,
    candidate: &Participant,
    roster: &Roster,
    existing: &Assignments,
) -> bool {
    let mut givers = roster
        .members()
        .iter()
        .filter(|p| *p != requester && !existing.contains_key(*p));
    let mut recipients = roster
        .members()
        .iter()
        .filter(|p| *p != candidate && !existing.values().any(|v| v == *p));

    match (givers.next(), givers.next(), recipients.next(), recipients.next()) {
        (Some(g), None, Some(r), None) => g == r,
        _ => false,
    }
}

impl FromStr for DrawStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(DrawStrategy::Greedy),
            "lookahead" => Ok(DrawStrategy::Lookahead),
            other => Err(format!(
                "unknown draw strategy {:?} (expected greedy or lookahead)",
                other
            )),
        }
    }
}

impl fmt::Display for DrawStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawStrategy::Greedy => f.write_str("greedy"),
            DrawStrategy::Lookahead => f.write_str("lookahead"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pick, draw};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn p(name: &str) -> Participant {
        Participant::parse(name).unwrap()
    }

    #[test]
    fn lookahead_avoids_dead_end() {
        let roster = Roster::new(["a", "b", "c"]);
        let mut existing = Assignments::new();
        existing.insert(p("a"), p("b"));

        // Picking a would leave c facing only c.
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pick = draw(DrawStrategy::Lookahead, &p("b"), &roster, &existing, &mut rng).unwrap();
            assert_eq!(pick, Pick::New(p("c")));
        }
    }

    #[test]
    fn lookahead_always_completes_the_draw() {
        let names = ["ana", "luis", "carla", "pedro", "sofia", "diego", "eva"];
        for size in 2..=names.len() {
            let roster = Roster::new(names[..size].iter().copied());
            for seed in 0..50 {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut order: Vec<Participant> = roster.members().to_vec();
                order.shuffle(&mut rng);

                let mut existing = Assignments::new();
                for giver in &order {
                    let pick =
                        draw(DrawStrategy::Lookahead, giver, &roster, &existing, &mut rng).unwrap();
                    existing.insert(giver.clone(), pick.into_recipient());
                }

                assert_eq!(existing.len(), size);
                let mut recipients: Vec<&Participant> = existing.values().collect();
                recipients.sort();
                recipients.dedup();
                assert_eq!(recipients.len(), size);
                assert!(existing.iter().all(|(g, r)| g != r));
            }
        }
    }

    #[test]
    fn greedy_leaves_pool_untouched() {
        let roster = Roster::new(["a", "b", "c"]);
        let mut existing = Assignments::new();
        existing.insert(p("a"), p("b"));
        let (a, c) = (p("a"), p("c"));
        let pool = vec![&a, &c];
        let narrowed = DrawStrategy::Greedy.narrow(&p("b"), &roster, &existing, pool.clone());
        assert_eq!(narrowed, pool);
    }

    #[test]
    fn parses_names() {
        assert_eq!("greedy".parse::<DrawStrategy>(), Ok(DrawStrategy::Greedy));
        assert_eq!(" Lookahead ".parse::<DrawStrategy>(), Ok(DrawStrategy::Lookahead));
        assert!("random".parse::<DrawStrategy>().is_err());
    }
}
