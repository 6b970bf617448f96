//! Dense vector helpers shared by the encoder and the ranking engine.

pub fn is_zero(vec: &[f32]) -> bool {
	vec.iter().all(|value| *value == 0.0)
}

pub fn norm(vec: &[f32]) -> f32 {
	vec.iter().map(|value| value * value).sum::<f32>().sqrt()
}

/// Scales `vec` to unit length in place. Returns `false` and leaves it untouched when the norm
/// is zero or not finite.
pub fn normalize(vec: &mut [f32]) -> bool {
	let norm = norm(vec);

	if norm == 0.0 || !norm.is_finite() {
		return false;
	}

	for value in vec.iter_mut() {
		*value /= norm;
	}

	true
}

/// Cosine similarity. Zero vectors and mismatched lengths score 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() {
		return 0.0;
	}

	let (na, nb) = (norm(a), norm(b));

	if na == 0.0 || nb == 0.0 {
		return 0.0;
	}

	let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();

	dot / (na * nb)
}

/// Arithmetic mean of the non-zero vectors, re-normalized to unit length.
///
/// Returns the zero vector of length `dims` when nothing contributes.
pub fn mean_normalized<'a, I>(vectors: I, dims: usize) -> Vec<f32>
where
	I: IntoIterator<Item = &'a [f32]>,
{
	let mut sum = vec![0.0_f32; dims];
	let mut count = 0_usize;

	for vec in vectors {
		if vec.len() != dims || is_zero(vec) {
			continue;
		}

		for (acc, value) in sum.iter_mut().zip(vec) {
			*acc += value;
		}

		count += 1;
	}

	if count == 0 {
		return sum;
	}

	for value in sum.iter_mut() {
		*value /= count as f32;
	}

	if !normalize(&mut sum) {
		return vec![0.0; dims];
	}

	sum
}
