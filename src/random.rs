// Injectable source of uniform random integers
//
// Shapes never talk to a global RNG: every setup/mutate call receives a
// `RandomSource`, so a run can be reproduced from a recorded stream.
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::{Error, Result};

/// A source of uniformly distributed integers
pub trait RandomSource {
    /// Return an integer in `[min, max]`, both inclusive
    fn random_range(&mut self, min: i32, max: i32) -> i32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random_range(&mut self, min: i32, max: i32) -> i32 {
        (**self).random_range(min, max)
    }
}

/// Seeded PCG generator, the source used outside of tests
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn random_range(&mut self, min: i32, max: i32) -> i32 {
        // An empty range has only one sensible answer
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// One recorded call to `random_range`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedDraw {
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl RecordedDraw {
    fn to_trace_line(self) -> String {
        format!("{} (min:{},max:{})", self.value, self.min, self.max)
    }
}

/// Replays a recorded stream of draws
///
/// Each request must ask for exactly the bounds that were recorded; anything
/// else means the code under test diverged from the recording, and the replay
/// panics.
#[derive(Clone, Debug)]
pub struct ReplayRandom {
    draws: Vec<RecordedDraw>,
    cursor: usize,
}

impl ReplayRandom {
    pub fn new(draws: Vec<RecordedDraw>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Parse a trace with one draw per line: `value (min:a,max:b)`
    ///
    /// Blank lines are ignored.
    pub fn from_trace(trace: &str) -> Result<Self> {
        let draws = trace
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                parse_trace_line(line).ok_or_else(|| Error::MalformedTrace {
                    line: index + 1,
                    text: line.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(draws))
    }

    /// Number of draws not consumed yet
    pub fn remaining(&self) -> usize {
        self.draws.len() - self.cursor
    }
}

impl RandomSource for ReplayRandom {
    fn random_range(&mut self, min: i32, max: i32) -> i32 {
        let draw = *self
            .draws
            .get(self.cursor)
            .unwrap_or_else(|| panic!("random trace exhausted after {} draws", self.cursor));
        assert!(
            draw.min == min && draw.max == max,
            "random draw {} requested (min:{min},max:{max}) but trace recorded (min:{},max:{})",
            self.cursor,
            draw.min,
            draw.max
        );
        self.cursor += 1;
        draw.value
    }
}

fn parse_trace_line(line: &str) -> Option<RecordedDraw> {
    // "17 (min:-16,max:16)" with arbitrary whitespace
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let (value, rest) = compact.split_once("(min:")?;
    let (min, rest) = rest.split_once(",max:")?;
    let max = rest.strip_suffix(')')?;
    Some(RecordedDraw {
        value: value.parse().ok()?,
        min: min.parse().ok()?,
        max: max.parse().ok()?,
    })
}

/// Wraps another source and records every draw it hands out
#[derive(Clone, Debug)]
pub struct RecordingRandom<R> {
    inner: R,
    draws: Vec<RecordedDraw>,
}

impl<R: RandomSource> RecordingRandom<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            draws: Vec::new(),
        }
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// The recording in the format read by [`ReplayRandom::from_trace`]
    pub fn trace(&self) -> String {
        self.draws
            .iter()
            .map(|draw| draw.to_trace_line() + "\n")
            .collect()
    }

    /// A replay of everything recorded so far
    pub fn replay(&self) -> ReplayRandom {
        ReplayRandom::new(self.draws.clone())
    }
}

impl<R: RandomSource> RandomSource for RecordingRandom<R> {
    fn random_range(&mut self, min: i32, max: i32) -> i32 {
        let value = self.inner.random_range(min, max);
        self.draws.push(RecordedDraw { value, min, max });
        value
    }
}
