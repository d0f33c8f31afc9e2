/// Adventuring Party example: forges a small party from the shipped lore.
///
/// A mini scenario: a Nord warrior, an elder mage of any race, and two
/// characters left entirely to chance, followed by a bulk request.
///
/// Run with: cargo run --example adventuring_party

use character_forge::core::forge::{CharacterForge, ForgeResponse};
use character_forge::core::overrides::Overrides;
use character_forge::core::request::BulkRequest;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let forge = CharacterForge::builder()
        .lore_dir("lore_data")
        .build()
        .expect("Failed to build forge");

    let mut rng = StdRng::seed_from_u64(2026);

    let party = [
        Overrides::new().with("race", "Nord").with("class", "Warrior"),
        Overrides::new().with("class", "Mage").with("age_label", "Elder"),
        Overrides::new(),
        Overrides::new().with("place", "Riften"),
    ];

    println!("=== The Party ===\n");
    for overrides in &party {
        print_sheet(&forge.forge(overrides, &mut rng));
    }

    // --- Bulk: three recruits, the first two with fixed races ---
    println!("=== Recruits ===\n");
    let request = BulkRequest::parse([("count", "3"), ("race", "khajiit,argonian")]);
    for response in forge.generate_bulk(&request, &mut rng) {
        print_sheet(&response);
    }
}

fn print_sheet(response: &ForgeResponse) {
    let Some(c) = response.character() else {
        println!("  ({})\n", response.error().unwrap_or("unknown error"));
        return;
    };

    println!("{} {}", c.name, c.title);
    println!(
        "  {} {} ({}), {} {}, age {} ({})",
        c.race.name, c.class.name, c.gender.pronouns, c.gender.label, c.celestial_mark.name,
        c.age.value, c.age.label
    );
    println!("  {} cm, {} kg", c.body.height_cm, c.body.weight_kg);
    println!("  From {} in {}", c.origin.place, c.origin.name);
    println!("  {} of {}, member of the {}", c.follower.follower, c.follower.deity, c.faction.name);
    println!("  Fights with: {}", c.fighting_style);
    println!("  Favorite dish: {}", c.favorite_dish);
    println!("  \"{}\"", c.quote);
    println!("  {}\n", c.backstory);
}
