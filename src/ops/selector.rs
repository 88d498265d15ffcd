use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::config::RevealConfig;
use crate::model::task::Task;

/// Number of candidates flashed before the committed pick
pub const REVEAL_STEPS: usize = 30;

/// Delay between two flashed candidates
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Task list is empty!")]
pub struct EmptyTaskListError;

/// Draw one task uniformly at random
pub fn draw<R: Rng + ?Sized>(tasks: &[Task], rng: &mut R) -> Option<Task> {
    tasks.choose(rng).cloned()
}

/// Draw one task uniformly at random with the thread-local generator
pub fn pick(tasks: &[Task]) -> Option<Task> {
    draw(tasks, &mut rand::thread_rng())
}

/// Shape of the reveal animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub steps: usize,
    pub interval: Duration,
}

impl Default for Reveal {
    fn default() -> Self {
        Reveal {
            steps: REVEAL_STEPS,
            interval: REVEAL_INTERVAL,
        }
    }
}

impl From<&RevealConfig> for Reveal {
    fn from(config: &RevealConfig) -> Self {
        Reveal {
            steps: config.steps,
            interval: config.interval(),
        }
    }
}

impl Reveal {
    /// Run the reveal on a worker thread.
    ///
    /// Calls `on_tick` `steps` times with a random candidate, `interval`
    /// apart, then `on_done` exactly once with an independent final draw.
    /// The sequence cannot be stopped once started.
    pub fn run<T, D>(
        &self,
        tasks: &[Task],
        mut on_tick: T,
        on_done: D,
    ) -> Result<JoinHandle<()>, EmptyTaskListError>
    where
        T: FnMut(Task) + Send + 'static,
        D: FnOnce(Task) + Send + 'static,
    {
        if tasks.is_empty() {
            return Err(EmptyTaskListError);
        }
        let pool = tasks.to_vec();
        let Reveal { steps, interval } = *self;

        Ok(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for _ in 0..steps {
                if let Some(candidate) = draw(&pool, &mut rng) {
                    on_tick(candidate);
                }
                thread::sleep(interval);
            }
            if let Some(selected) = draw(&pool, &mut rng) {
                on_done(selected);
            }
        }))
    }
}

/// Run the default 30-step reveal over `tasks`
pub fn select_and_reveal<T, D>(
    tasks: &[Task],
    on_tick: T,
    on_done: D,
) -> Result<JoinHandle<()>, EmptyTaskListError>
where
    T: FnMut(Task) + Send + 'static,
    D: FnOnce(Task) + Send + 'static,
{
    Reveal::default().run(tasks, on_tick, on_done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;

    fn tasks(labels: &[&str]) -> Vec<Task> {
        labels.iter().map(|l| Task::new(l).unwrap()).collect()
    }

    #[derive(Debug, PartialEq)]
    enum Seen {
        Tick(Task),
        Done(Task),
    }

    fn run_collect(reveal: Reveal, pool: &[Task]) -> Vec<Seen> {
        let (tx, rx) = mpsc::channel();
        let done_tx = tx.clone();
        let worker = reveal
            .run(
                pool,
                move |t| {
                    let _ = tx.send(Seen::Tick(t));
                },
                move |t| {
                    let _ = done_tx.send(Seen::Done(t));
                },
            )
            .unwrap();
        worker.join().unwrap();
        rx.try_iter().collect()
    }

    #[test]
    fn ticks_fixed_count_then_done_once() {
        let pool = tasks(&["Write a blog post", "Fix bugs", "Review a PR"]);
        let reveal = Reveal {
            steps: 30,
            interval: Duration::from_millis(1),
        };

        let seen = run_collect(reveal, &pool);
        assert_eq!(seen.len(), 31);

        let ticks = seen.iter().filter(|s| matches!(s, Seen::Tick(_))).count();
        assert_eq!(ticks, 30);

        // Done comes last and exactly once
        let dones: Vec<&Task> = seen
            .iter()
            .filter_map(|s| match s {
                Seen::Done(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(dones.len(), 1);
        assert!(matches!(seen.last(), Some(Seen::Done(_))));
        assert!(pool.contains(dones[0]));
    }

    #[test]
    fn every_candidate_comes_from_the_list() {
        let pool = tasks(&["a", "b"]);
        let reveal = Reveal {
            steps: 10,
            interval: Duration::ZERO,
        };
        for seen in run_collect(reveal, &pool) {
            let (Seen::Tick(t) | Seen::Done(t)) = seen;
            assert!(pool.contains(&t));
        }
    }

    #[test]
    fn zero_steps_still_commits() {
        let pool = tasks(&["only"]);
        let reveal = Reveal {
            steps: 0,
            interval: Duration::ZERO,
        };
        assert_eq!(
            run_collect(reveal, &pool),
            vec![Seen::Done(Task::new("only").unwrap())]
        );
    }

    #[test]
    fn empty_list_is_an_error() {
        let result = select_and_reveal(&[], |_| {}, |_| {});
        assert_eq!(result.err(), Some(EmptyTaskListError));
    }

    #[test]
    fn draws_cover_the_list() {
        let pool = tasks(&["a", "b", "c"]);
        let mut rng = rand::thread_rng();
        let seen: HashSet<Task> = (0..500).filter_map(|_| draw(&pool, &mut rng)).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn pick_from_empty_is_none() {
        assert!(pick(&[]).is_none());
    }

    #[test]
    fn default_shape() {
        let reveal = Reveal::default();
        assert_eq!(reveal.steps, 30);
        assert_eq!(reveal.interval, Duration::from_millis(50));
    }
}
