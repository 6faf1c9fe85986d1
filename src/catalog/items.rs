//! Static item data: components, recipes and item categories.
//!
//! The tables are read-only for the whole process. Everything the item rules
//! need to know about an item name goes through [`ItemTable`].

use std::collections::{BTreeMap, BTreeSet};

/// The generic component that two-of-a-kind glove-making consumes.
pub const GLOVE_COMPONENT: &str = "SparringGloves";
/// The full-completion item made from two [`GLOVE_COMPONENT`]s.
pub const CRAFTED_GLOVES: &str = "ThiefsGloves";
/// Inventory relic that raises the board limit by one.
pub const SIZE_RELIC: &str = "TacticiansCrown";

const COMPONENTS: &[&str] = &[
    "BFSword",
    "ChainVest",
    "GiantsBelt",
    "NeedlesslyLargeRod",
    "NegatronCloak",
    "RecurveBow",
    "SparringGloves",
    "Spatula",
    "TearoftheGoddess",
];

const RECIPES: &[(&str, &str, &str)] = &[
    ("ArchangelsStaff", "NeedlesslyLargeRod", "TearoftheGoddess"),
    ("SlayerEmblem", "SparringGloves", "Spatula"),
    ("Guardbreaker", "GiantsBelt", "SparringGloves"),
    ("Bloodthirster", "BFSword", "NegatronCloak"),
    ("BlueBuff", "TearoftheGoddess", "TearoftheGoddess"),
    ("BrambleVest", "ChainVest", "ChainVest"),
    ("JuggernautEmblem", "ChainVest", "Spatula"),
    ("ChaliceofPower", "NegatronCloak", "TearoftheGoddess"),
    ("Deathblade", "BFSword", "BFSword"),
    ("ShurimaEmblem", "NeedlesslyLargeRod", "Spatula"),
    ("DragonsClaw", "NegatronCloak", "NegatronCloak"),
    ("EdgeofNight", "BFSword", "ChainVest"),
    ("ProtectorsVow", "ChainVest", "TearoftheGoddess"),
    ("GargoyleStoneplate", "ChainVest", "NegatronCloak"),
    ("GiantSlayer", "BFSword", "RecurveBow"),
    ("NoxusEmblem", "GiantsBelt", "Spatula"),
    ("GuinsoosRageblade", "NeedlesslyLargeRod", "RecurveBow"),
    ("HandofJustice", "SparringGloves", "TearoftheGoddess"),
    ("HextechGunblade", "BFSword", "NeedlesslyLargeRod"),
    ("InfinityEdge", "BFSword", "SparringGloves"),
    ("IoniaEmblem", "BFSword", "Spatula"),
    ("IonicSpark", "NeedlesslyLargeRod", "NegatronCloak"),
    ("JeweledGauntlet", "NeedlesslyLargeRod", "SparringGloves"),
    ("LastWhisper", "RecurveBow", "SparringGloves"),
    ("LocketoftheIronSolari", "ChainVest", "NeedlesslyLargeRod"),
    ("SorcererEmblem", "TearoftheGoddess", "Spatula"),
    ("DemaciaEmblem", "NegatronCloak", "Spatula"),
    ("Morellonomicon", "GiantsBelt", "NeedlesslyLargeRod"),
    ("Quicksilver", "NegatronCloak", "SparringGloves"),
    ("RabadonsDeathcap", "NeedlesslyLargeRod", "NeedlesslyLargeRod"),
    ("ChallengerEmblem", "RecurveBow", "Spatula"),
    ("RapidFirecannon", "RecurveBow", "RecurveBow"),
    ("Redemption", "GiantsBelt", "TearoftheGoddess"),
    ("RunaansHurricane", "NegatronCloak", "RecurveBow"),
    ("ShroudofStillness", "ChainVest", "SparringGloves"),
    ("SpearofShojin", "BFSword", "TearoftheGoddess"),
    ("StatikkShiv", "RecurveBow", "TearoftheGoddess"),
    ("SunfireCape", "ChainVest", "GiantsBelt"),
    ("TacticiansCrown", "Spatula", "Spatula"),
    ("ThiefsGloves", "SparringGloves", "SparringGloves"),
    ("TitansResolve", "ChainVest", "RecurveBow"),
    ("WarmogsArmor", "GiantsBelt", "GiantsBelt"),
    ("ZekesHerald", "BFSword", "GiantsBelt"),
    ("Zephyr", "GiantsBelt", "NegatronCloak"),
    ("ZzRotPortal", "GiantsBelt", "RecurveBow"),
];

/// `(radiant, base)` pairs.
const RADIANTS: &[(&str, &str)] = &[
    ("UrfAngelsStaff", "ArchangelsStaff"),
    ("BlessedBloodthirster", "Bloodthirster"),
    ("BlueBlessing", "BlueBuff"),
    ("RosethornVest", "BrambleVest"),
    ("ChaliceofCharity", "ChaliceofPower"),
    ("LuminousDeathblade", "Deathblade"),
    ("DragonsWill", "DragonsClaw"),
    ("BrinkofDawn", "EdgeofNight"),
    ("BulwarksOath", "ProtectorsVow"),
    ("DvarapalaStoneplate", "GargoyleStoneplate"),
    ("DemonSlayer", "GiantSlayer"),
    ("GuinsoosReckoning", "GuinsoosRageblade"),
    ("FistofFairness", "HandofJustice"),
    ("HextechLifeblade", "HextechGunblade"),
    ("ZenithEdge", "InfinityEdge"),
    ("CovalentSpark", "IonicSpark"),
    ("GlamorousGauntlet", "JeweledGauntlet"),
    ("EternalWhisper", "LastWhisper"),
    ("LocketofTargonPrime", "LocketoftheIronSolari"),
    ("Moremoreellonomicon", "Morellonomicon"),
    ("Quickestsilver", "Quicksilver"),
    ("RabadonsAscendedDeathcap", "RabadonsDeathcap"),
    ("RapidLightcannon", "RapidFirecannon"),
    ("Absolution", "Redemption"),
    ("RunnansTempest", "RunaansHurricane"),
    ("ShroudofReverance", "ShroudofStillness"),
    ("SpearofHiranna", "SpearofShojin"),
    ("StatikkFavor", "StatikkShiv"),
    ("Stridebreaker", "Guardbreaker"),
    ("SunlightCape", "SunfireCape"),
    ("RascalsGloves", "ThiefsGloves"),
    ("TitansVow", "TitansResolve"),
    ("WarmogsPride", "WarmogsArmor"),
    ("ZekesHarmony", "ZekesHerald"),
    ("Mistral", "Zephyr"),
    ("ZzRotsInvitation", "ZzRotPortal"),
];

const ARTIFACTS: &[&str] = &[
    "BlacksmithsGloves",
    "AccomplicesGloves",
    "DeathfireGrasp",
    "Hullcrusher",
    "ObsidianCleaver",
    "DeathsDefiance",
    "EternalWinter",
    "Manazane",
    "RaduinsSanctum",
    "AnimaVisage",
    "GoldCollector",
    "ZhonyasParadox",
    "SnipersFocus",
    "TrickstersGlass",
];

/// Items that fill every item slot of their holder.
const GLOVES: &[&str] = &["ThiefsGloves", "BlacksmithsGloves", "RascalsGloves", "AccomplicesGloves"];

/// Finished items that are only worth giving as filler.
const FORCED: &[&str] = &[
    "InductionPoweredWarmogsArmor",
    "JumpStartedSpearofShojin",
    "MagnetizedIonicSpark",
    "HandofNondeterministicJustice",
    "ChainswordBloodthirster",
    "ShroudofEvenStillerness",
    "OverclockedSunfireCape",
];

const REMOVERS: &[&str] = &["MagneticRemover", "ComponentRemover"];

/// `(duplicator, max unit cost)`.
const DUPLICATORS: &[(&str, u32)] = &[("LesserChampionDuplicator", 3), ("ChampionDuplicator", 5)];

const RADIANT_UPGRADE: &str = "MasterworkUpgrade";

/// Single-use items that act on a unit without occupying an item slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumable {
    ComponentRemover,
    Duplicator { max_cost: u32 },
    RadiantUpgrade,
}

/// Coarse category of an item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Component,
    Craftable,
    Radiant,
    Artifact,
    /// Trait emblem that cannot be crafted.
    Emblem,
    Forced,
    Consumable(Consumable),
    Unknown,
}

/// Lookup tables for item names.
#[derive(Debug, Clone)]
pub struct ItemTable {
    components: BTreeSet<String>,
    recipes: BTreeMap<String, (String, String)>,
    radiant_base: BTreeMap<String, String>,
    radiant_of: BTreeMap<String, String>,
    artifacts: BTreeSet<String>,
    gloves: BTreeSet<String>,
    forced: BTreeSet<String>,
}

fn owned(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl ItemTable {
    /// Builds the table for the current game data.
    pub fn standard() -> Self {
        ItemTable {
            components: owned(COMPONENTS),
            recipes: RECIPES
                .iter()
                .map(|(item, a, b)| (item.to_string(), (a.to_string(), b.to_string())))
                .collect(),
            radiant_base: RADIANTS.iter().map(|(r, b)| (r.to_string(), b.to_string())).collect(),
            radiant_of: RADIANTS.iter().map(|(r, b)| (b.to_string(), r.to_string())).collect(),
            artifacts: owned(ARTIFACTS),
            gloves: owned(GLOVES),
            forced: owned(FORCED),
        }
    }

    pub fn kind(&self, item: &str) -> ItemKind {
        if let Some(c) = self.consumable(item) {
            ItemKind::Consumable(c)
        } else if self.components.contains(item) {
            ItemKind::Component
        } else if self.recipes.contains_key(item) {
            ItemKind::Craftable
        } else if self.radiant_base.contains_key(item) {
            ItemKind::Radiant
        } else if self.artifacts.contains(item) {
            ItemKind::Artifact
        } else if item.ends_with("Emblem") {
            ItemKind::Emblem
        } else if self.forced.contains(item) {
            ItemKind::Forced
        } else {
            ItemKind::Unknown
        }
    }

    pub fn consumable(&self, item: &str) -> Option<Consumable> {
        if REMOVERS.contains(&item) {
            return Some(Consumable::ComponentRemover);
        }
        if item == RADIANT_UPGRADE {
            return Some(Consumable::RadiantUpgrade);
        }
        DUPLICATORS
            .iter()
            .find(|(name, _)| *name == item)
            .map(|(_, max_cost)| Consumable::Duplicator { max_cost: *max_cost })
    }

    pub fn is_component(&self, item: &str) -> bool {
        self.components.contains(item)
    }

    /// Whether `item` takes a full item slot (two slot-units) when given.
    pub fn is_finished(&self, item: &str) -> bool {
        !matches!(self.kind(item), ItemKind::Component | ItemKind::Consumable(_))
    }

    pub fn is_artifact(&self, item: &str) -> bool {
        self.artifacts.contains(item)
    }

    pub fn is_glove(&self, item: &str) -> bool {
        self.gloves.contains(item)
    }

    pub fn is_emblem(&self, item: &str) -> bool {
        item.ends_with("Emblem")
    }

    /// Items that may be handed out as filler to a unit with no build left.
    pub fn is_fallback_eligible(&self, item: &str) -> bool {
        if self.is_emblem(item) {
            return false;
        }
        self.recipes.contains_key(item)
            || self.radiant_base.contains_key(item)
            || self.forced.contains(item)
            || self.gloves.contains(item)
    }

    /// The two components of a craftable item.
    pub fn recipe(&self, item: &str) -> Option<(&str, &str)> {
        self.recipes.get(item).map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// What two components make when combined on a unit.
    pub fn combine(&self, a: &str, b: &str) -> Option<&str> {
        self.recipes
            .iter()
            .find(|(_, (x, y))| (x == a && y == b) || (x == b && y == a))
            .map(|(item, _)| item.as_str())
    }

    /// The base item of a radiant item.
    pub fn radiant_base(&self, item: &str) -> Option<&str> {
        self.radiant_base.get(item).map(String::as_str)
    }

    /// The radiant version of a base item.
    pub fn radiant_of(&self, base: &str) -> Option<&str> {
        self.radiant_of.get(base).map(String::as_str)
    }

    /// Every item name the table knows, consumables included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .chain(self.recipes.keys())
            .chain(self.radiant_base.keys())
            .chain(&self.artifacts)
            .chain(&self.forced)
            .map(String::as_str)
            .chain(REMOVERS.iter().copied())
            .chain(DUPLICATORS.iter().map(|(name, _)| *name))
            .chain(std::iter::once(RADIANT_UPGRADE))
    }
}

impl Default for ItemTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_items() {
        let t = ItemTable::standard();
        assert_eq!(t.kind("BFSword"), ItemKind::Component);
        assert_eq!(t.kind("EdgeofNight"), ItemKind::Craftable);
        assert_eq!(t.kind("BrinkofDawn"), ItemKind::Radiant);
        assert_eq!(t.kind("Hullcrusher"), ItemKind::Artifact);
        assert_eq!(t.kind("VoidEmblem"), ItemKind::Emblem);
        assert_eq!(t.kind("SorcererEmblem"), ItemKind::Craftable);
        assert_eq!(
            t.kind("LesserChampionDuplicator"),
            ItemKind::Consumable(Consumable::Duplicator { max_cost: 3 })
        );
        assert_eq!(t.kind("MagneticRemover"), ItemKind::Consumable(Consumable::ComponentRemover));
        assert_eq!(t.kind("Rock"), ItemKind::Unknown);
    }

    #[test]
    fn recipes_and_combinations_agree() {
        let t = ItemTable::standard();
        assert_eq!(t.recipe("EdgeofNight"), Some(("BFSword", "ChainVest")));
        assert_eq!(t.combine("ChainVest", "BFSword"), Some("EdgeofNight"));
        assert_eq!(t.combine("SparringGloves", "SparringGloves"), Some(CRAFTED_GLOVES));
        assert_eq!(t.combine("BFSword", "Rock"), None);
    }

    #[test]
    fn every_recipe_uses_components() {
        let t = ItemTable::standard();
        for (item, a, b) in RECIPES {
            assert!(t.is_component(a) && t.is_component(b), "{} has a bad recipe", item);
        }
    }

    #[test]
    fn radiant_maps_both_ways() {
        let t = ItemTable::standard();
        assert_eq!(t.radiant_base("ZenithEdge"), Some("InfinityEdge"));
        assert_eq!(t.radiant_of("InfinityEdge"), Some("ZenithEdge"));
        assert!(t.is_glove("RascalsGloves"));
        assert!(t.is_finished("RascalsGloves"));
        assert!(!t.is_finished("Spatula"));
    }
}
