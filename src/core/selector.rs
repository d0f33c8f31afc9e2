/// Selector: override, then filtered random, then unfiltered random.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::schema::entity::Named;

/// Case-insensitive exact-name match of `wanted` in `candidates`.
pub fn match_name<'a, T: Named>(candidates: &'a [T], wanted: Option<&str>) -> Option<&'a T> {
    let wanted = wanted?;
    candidates.iter().find(|c| c.is_named(wanted))
}

/// Resolve one entity with no compatibility filter.
pub fn resolve<'a, T, R>(candidates: &'a [T], wanted: Option<&str>, rng: &mut R) -> Option<&'a T>
where
    T: Named,
    R: Rng + ?Sized,
{
    resolve_filtered(candidates, wanted, |_| true, rng)
}

/// Resolve one entity.
///
/// An override that names a candidate wins outright, bypassing `allowed`.
/// Otherwise a candidate passing `allowed` is drawn uniformly; when none
/// pass, the draw is taken from the whole list instead. Returns `None` only
/// when `candidates` is empty.
pub fn resolve_filtered<'a, T, R, F>(
    candidates: &'a [T],
    wanted: Option<&str>,
    allowed: F,
    rng: &mut R,
) -> Option<&'a T>
where
    T: Named,
    R: Rng + ?Sized,
    F: Fn(&T) -> bool,
{
    if let Some(found) = match_name(candidates, wanted) {
        return Some(found);
    }
    if let Some(wanted) = wanted {
        tracing::warn!(
            kind = short_type_name::<T>(),
            "override '{}' matches nothing, selecting at random",
            wanted
        );
    }

    let filtered: Vec<&T> = candidates.iter().filter(|c| allowed(*c)).collect();
    if let Some(choice) = filtered.choose(rng) {
        return Some(*choice);
    }

    if !candidates.is_empty() {
        tracing::warn!(
            kind = short_type_name::<T>(),
            candidates = candidates.len(),
            "compatibility rules left no candidates, drawing from full table"
        );
    }
    candidates.choose(rng)
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
