/// Faction selection: symmetric rivalry checks and relationship views.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::schema::faction::{Faction, FactionRelations};

/// Whether `faction` conflicts with anything in `pool`.
///
/// A conflict exists when `faction` names a pool member as a rival, or a
/// pool member names `faction` as one.
pub fn conflicts_with(faction: &Faction, pool: &[&Faction]) -> bool {
    let pool_names: FxHashSet<String> = pool
        .iter()
        .filter(|other| !other.name.eq_ignore_ascii_case(&faction.name))
        .map(|other| other.name.to_lowercase())
        .collect();

    let declared = faction
        .rivals
        .iter()
        .any(|rival| pool_names.contains(&rival.to_lowercase()));
    let implied = pool
        .iter()
        .filter(|other| !other.name.eq_ignore_ascii_case(&faction.name))
        .any(|other| other.lists_rival(&faction.name));

    declared || implied
}

/// Pick a faction from `candidates` that has no rival in the pool.
///
/// Candidates are scanned in shuffled order. If every candidate conflicts,
/// any candidate is accepted; an empty pool yields the unaffiliated record.
pub fn pick_non_conflicting<R: Rng + ?Sized>(candidates: &[&Faction], rng: &mut R) -> Faction {
    if candidates.is_empty() {
        tracing::warn!("no eligible faction candidates, character is unaffiliated");
        return Faction::unaffiliated();
    }

    let mut order: Vec<&Faction> = candidates.to_vec();
    order.shuffle(rng);
    if let Some(free) = order.iter().find(|f| !conflicts_with(f, candidates)) {
        return (*free).clone();
    }

    tracing::debug!(
        candidates = candidates.len(),
        "every faction candidate has a rival in the pool, accepting any"
    );
    candidates
        .choose(rng)
        .map(|f| (*f).clone())
        .unwrap_or_else(Faction::unaffiliated)
}

/// Allies and rivals of the named faction as listed in `factions`.
///
/// Unknown names yield empty lists.
pub fn relations_for(name: &str, factions: &[Faction]) -> FactionRelations {
    match factions.iter().find(|f| f.name.eq_ignore_ascii_case(name)) {
        Some(f) => FactionRelations {
            allies: f.allies.clone(),
            rivals: f.rivals.clone(),
        },
        None => {
            tracing::warn!("faction '{}' not found in lore, reporting no relations", name);
            FactionRelations::default()
        }
    }
}
