use rand::Rng;

/// Capability providing a uniform choice among `len` items.
///
/// Every `rand::Rng` is a `RandomSource`, so callers normally pass
/// `rand::rng()` or a seeded `StdRng`. Tests may implement it directly
/// to script the exact choices made by a walk.
pub trait RandomSource {
	/// Returns an index drawn uniformly from `0..len`.
	///
	/// Callers never pass `len == 0`.
	fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
	fn pick(&mut self, len: usize) -> usize {
		self.random_range(0..len)
	}
}

/// Picks a uniformly random element of `items`.
///
/// Returns `None` if `items` is empty.
pub fn choose<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
	R: RandomSource + ?Sized,
{
	if items.is_empty() {
		return None;
	}
	items.get(rng.pick(items.len()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn choose_on_empty_slice_is_none() {
		let mut rng = StdRng::seed_from_u64(7);
		let items: [u8; 0] = [];
		assert!(choose(&items[..], &mut rng).is_none());
	}

	#[test]
	fn pick_stays_in_bounds() {
		let mut rng = StdRng::seed_from_u64(7);
		for len in 1..50 {
			assert!(rng.pick(len) < len);
		}
	}

	#[test]
	fn seeded_sources_repeat_their_choices() {
		let items = ["a", "b", "c", "d", "e"];
		let mut first = StdRng::seed_from_u64(42);
		let mut second = StdRng::seed_from_u64(42);
		let a: Vec<_> = (0..20).map(|_| choose(&items[..], &mut first)).collect();
		let b: Vec<_> = (0..20).map(|_| choose(&items[..], &mut second)).collect();
		assert_eq!(a, b);
	}
}
