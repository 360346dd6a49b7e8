/// Display names for relics, indexed by relic id. The game has no
/// API to resolve these at runtime, so the list lives here.
pub fn relic_name(relic: u32) -> Option<&'static str> {
    let name = match relic {
        1 => "Tallow Candle",
        2 => "Gravedigger's Coin",
        3 => "Cracked Hourglass",
        4 => "Rusted Thurible",
        5 => "Mourner's Veil",
        6 => "Chipped Fang",
        7 => "Saint's Knucklebone",
        8 => "Ember in Glass",
        9 => "Moth-Eaten Banner",
        10 => "Leaden Die",
        11 => "Catacomb Key",
        12 => "Weeping Idol",
        13 => "Salt Ring",
        14 => "Bone Whistle",
        15 => "Pauper's Crown",
        16 => "Split Geode",
        17 => "Warden's Seal",
        18 => "Tattered Psalter",
        19 => "Blind Cartographer's Lens",
        20 => "Vial of Grave Dew",
        21 => "Sexton's Bell",
        22 => "Petrified Rat",
        23 => "Threadbare Gauntlet",
        24 => "Ossuary Dust",
        25 => "Lamplighter's Wick",
        26 => "Crooked Nail",
        27 => "Anchorite's Chain",
        28 => "Hollow Acorn",
        29 => "Beggar's Bowl",
        30 => "Sunken Signet",
        31 => "Plague Doctor's Charm",
        32 => "Forgotten Epitaph",
        _ => return None,
    };
    Some(name)
}
