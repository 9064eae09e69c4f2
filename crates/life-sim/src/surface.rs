/// Selector for one half of a [`SurfacePair`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Two equally-sized surfaces, one of which is current.
///
/// The non-current surface is only reachable mutably through [`split`],
/// alongside a shared borrow of the current one, so a step can never read and
/// write the same surface. Flipping swaps the selector, never the data.
///
/// [`split`]: SurfacePair::split
#[derive(Debug)]
pub struct SurfacePair<S> {
    surfaces: [S; 2],
    current: Slot,
}

impl<S> SurfacePair<S> {
    /// Creates a pair with `a` as current.
    pub fn new(a: S, b: S) -> Self {
        Self {
            surfaces: [a, b],
            current: Slot::A,
        }
    }

    #[inline]
    pub fn current_slot(&self) -> Slot {
        self.current
    }

    #[inline]
    pub fn current(&self) -> &S {
        &self.surfaces[self.current.index()]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut S {
        &mut self.surfaces[self.current.index()]
    }

    /// Returns `(current, other)`.
    pub fn split(&mut self) -> (&S, &mut S) {
        let [a, b] = &mut self.surfaces;
        match self.current {
            Slot::A => (&*a, b),
            Slot::B => (&*b, a),
        }
    }

    /// Makes the other surface current.
    #[inline]
    pub fn flip(&mut self) {
        self.current = self.current.other();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_hands_out_the_non_current_surface() {
        let mut pair = SurfacePair::new("a".to_string(), "b".to_string());
        {
            let (cur, other) = pair.split();
            assert_eq!(cur, "a");
            other.push('!');
        }
        assert_eq!(pair.current(), "a");
        pair.flip();
        assert_eq!(pair.current_slot(), Slot::B);
        assert_eq!(pair.current(), "b!");
        let (cur, other) = pair.split();
        assert_eq!(cur, "b!");
        assert_eq!(other, "a");
    }

    #[test]
    fn flip_alternates() {
        let mut pair = SurfacePair::new(1, 2);
        for i in 0..6 {
            let expected = if i % 2 == 0 { Slot::A } else { Slot::B };
            assert_eq!(pair.current_slot(), expected);
            pair.flip();
        }
    }
}
