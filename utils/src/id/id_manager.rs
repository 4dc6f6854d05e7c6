use num::{Bounded, FromPrimitive, Integer, ToPrimitive};
use serde::{Deserialize, Serialize};

use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RoadMarker;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct IntersectionMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Id<A, Int: Integer + Bounded + FromPrimitive + ToPrimitive> {
    id: Int,
    marker: PhantomData<A>,
}

/// All behaviour regarding id's should only be contained within this module so all functions
/// should be private
pub trait IdBehaviour: Copy {
    fn from_usize(val: usize) -> Self;
    fn to_usize(&self) -> usize;
}

impl<A: Copy, Int: Integer + Bounded + FromPrimitive + ToPrimitive + Copy> IdBehaviour
    for Id<A, Int>
{
    /// Saturates at the maximum value of `Int`. An arena never hands out that many ids.
    fn from_usize(val: usize) -> Self {
        Self {
            id: Int::from_usize(val).unwrap_or_else(Int::max_value),
            marker: PhantomData,
        }
    }

    fn to_usize(&self) -> usize {
        self.id.to_usize().unwrap_or(usize::MAX)
    }
}

impl<A, Int: Integer + Bounded + FromPrimitive + ToPrimitive + std::fmt::Display> std::fmt::Display
    for Id<A, Int>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdManager<A: IdBehaviour> {
    counter: usize,
    state: PhantomData<A>,
}

impl<A: IdBehaviour> Default for IdManager<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: IdBehaviour> IdManager<A> {
    pub fn new() -> Self {
        IdManager {
            counter: 0,
            state: PhantomData::<A>,
        }
    }

    pub fn gen(&mut self) -> A {
        let id = A::from_usize(self.counter);
        self.update_state();
        id
    }

    fn update_state(&mut self) {
        self.counter += 1;
    }
}
