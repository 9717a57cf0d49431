//! Species catalog
//!
//! National dex ids, display names and gender-ratio thresholds for every species of
//! the Hisui dex.

use crate::constants::{RATIO_FEMALE_ONLY, RATIO_GENDERLESS, RATIO_MALE_ONLY};

/// Catalog entry for one species
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeciesInfo {
    /// National dex number
    pub id: u16,
    /// English name, as used in allow-lists
    pub name: &'static str,
    /// Gender-ratio threshold (0 = male only, 254 = female only, 255 = genderless)
    pub gender_ratio: u8,
}

const fn sp(id: u16, name: &'static str, gender_ratio: u8) -> SpeciesInfo {
    SpeciesInfo {
        id,
        name,
        gender_ratio,
    }
}

const M7F1: u8 = 31;
const M3F1: u8 = 63;
const EVEN: u8 = 127;
const M1F3: u8 = 191;

/// Full Hisui dex, sorted by national id
static CATALOG: &[SpeciesInfo] = &[
    sp(25, "Pikachu", EVEN),
    sp(26, "Raichu", EVEN),
    sp(35, "Clefairy", M1F3),
    sp(36, "Clefable", M1F3),
    sp(37, "Vulpix", M1F3),
    sp(38, "Ninetales", M1F3),
    sp(41, "Zubat", EVEN),
    sp(42, "Golbat", EVEN),
    sp(46, "Paras", EVEN),
    sp(47, "Parasect", EVEN),
    sp(54, "Psyduck", EVEN),
    sp(55, "Golduck", EVEN),
    sp(58, "Growlithe", M3F1),
    sp(59, "Arcanine", M3F1),
    sp(63, "Abra", M3F1),
    sp(64, "Kadabra", M3F1),
    sp(65, "Alakazam", M3F1),
    sp(66, "Machop", M3F1),
    sp(67, "Machoke", M3F1),
    sp(68, "Machamp", M3F1),
    sp(72, "Tentacool", EVEN),
    sp(73, "Tentacruel", EVEN),
    sp(74, "Geodude", EVEN),
    sp(75, "Graveler", EVEN),
    sp(76, "Golem", EVEN),
    sp(77, "Ponyta", EVEN),
    sp(78, "Rapidash", EVEN),
    sp(81, "Magnemite", RATIO_GENDERLESS),
    sp(82, "Magneton", RATIO_GENDERLESS),
    sp(92, "Gastly", EVEN),
    sp(93, "Haunter", EVEN),
    sp(94, "Gengar", EVEN),
    sp(95, "Onix", EVEN),
    sp(100, "Voltorb", RATIO_GENDERLESS),
    sp(101, "Electrode", RATIO_GENDERLESS),
    sp(108, "Lickitung", EVEN),
    sp(111, "Rhyhorn", EVEN),
    sp(112, "Rhydon", EVEN),
    sp(113, "Chansey", RATIO_FEMALE_ONLY),
    sp(114, "Tangela", EVEN),
    sp(122, "Mr. Mime", EVEN),
    sp(123, "Scyther", EVEN),
    sp(125, "Electabuzz", M3F1),
    sp(126, "Magmar", M3F1),
    sp(129, "Magikarp", EVEN),
    sp(130, "Gyarados", EVEN),
    sp(133, "Eevee", M7F1),
    sp(134, "Vaporeon", M7F1),
    sp(135, "Jolteon", M7F1),
    sp(136, "Flareon", M7F1),
    sp(137, "Porygon", RATIO_GENDERLESS),
    sp(143, "Snorlax", M7F1),
    sp(155, "Cyndaquil", M7F1),
    sp(156, "Quilava", M7F1),
    sp(157, "Typhlosion", M7F1),
    sp(169, "Crobat", EVEN),
    sp(172, "Pichu", EVEN),
    sp(173, "Cleffa", M1F3),
    sp(175, "Togepi", M7F1),
    sp(176, "Togetic", M7F1),
    sp(185, "Sudowoodo", EVEN),
    sp(190, "Aipom", EVEN),
    sp(193, "Yanma", EVEN),
    sp(196, "Espeon", M7F1),
    sp(197, "Umbreon", M7F1),
    sp(198, "Murkrow", EVEN),
    sp(200, "Misdreavus", EVEN),
    sp(201, "Unown", RATIO_GENDERLESS),
    sp(207, "Gligar", EVEN),
    sp(208, "Steelix", EVEN),
    sp(211, "Qwilfish", EVEN),
    sp(212, "Scizor", EVEN),
    sp(214, "Heracross", EVEN),
    sp(215, "Sneasel", EVEN),
    sp(216, "Teddiursa", EVEN),
    sp(217, "Ursaring", EVEN),
    sp(220, "Swinub", EVEN),
    sp(221, "Piloswine", EVEN),
    sp(223, "Remoraid", EVEN),
    sp(224, "Octillery", EVEN),
    sp(226, "Mantine", EVEN),
    sp(233, "Porygon2", RATIO_GENDERLESS),
    sp(234, "Stantler", EVEN),
    sp(239, "Elekid", M3F1),
    sp(240, "Magby", M3F1),
    sp(242, "Blissey", RATIO_FEMALE_ONLY),
    sp(265, "Wurmple", EVEN),
    sp(266, "Silcoon", EVEN),
    sp(267, "Beautifly", EVEN),
    sp(268, "Cascoon", EVEN),
    sp(269, "Dustox", EVEN),
    sp(280, "Ralts", EVEN),
    sp(281, "Kirlia", EVEN),
    sp(282, "Gardevoir", EVEN),
    sp(299, "Nosepass", EVEN),
    sp(315, "Roselia", EVEN),
    sp(339, "Barboach", EVEN),
    sp(340, "Whiscash", EVEN),
    sp(355, "Duskull", EVEN),
    sp(356, "Dusclops", EVEN),
    sp(358, "Chimecho", EVEN),
    sp(361, "Snorunt", EVEN),
    sp(362, "Glalie", EVEN),
    sp(363, "Spheal", EVEN),
    sp(364, "Sealeo", EVEN),
    sp(365, "Walrein", EVEN),
    sp(387, "Turtwig", M7F1),
    sp(388, "Grotle", M7F1),
    sp(389, "Torterra", M7F1),
    sp(390, "Chimchar", M7F1),
    sp(391, "Monferno", M7F1),
    sp(392, "Infernape", M7F1),
    sp(393, "Piplup", M7F1),
    sp(394, "Prinplup", M7F1),
    sp(395, "Empoleon", M7F1),
    sp(396, "Starly", EVEN),
    sp(397, "Staravia", EVEN),
    sp(398, "Staraptor", EVEN),
    sp(399, "Bidoof", EVEN),
    sp(400, "Bibarel", EVEN),
    sp(401, "Kricketot", EVEN),
    sp(402, "Kricketune", EVEN),
    sp(403, "Shinx", EVEN),
    sp(404, "Luxio", EVEN),
    sp(405, "Luxray", EVEN),
    sp(406, "Budew", EVEN),
    sp(407, "Roserade", EVEN),
    sp(408, "Cranidos", M7F1),
    sp(409, "Rampardos", M7F1),
    sp(410, "Shieldon", M7F1),
    sp(411, "Bastiodon", M7F1),
    sp(412, "Burmy", EVEN),
    sp(413, "Wormadam", RATIO_FEMALE_ONLY),
    sp(414, "Mothim", RATIO_MALE_ONLY),
    sp(415, "Combee", M7F1),
    sp(416, "Vespiquen", RATIO_FEMALE_ONLY),
    sp(417, "Pachirisu", EVEN),
    sp(418, "Buizel", EVEN),
    sp(419, "Floatzel", EVEN),
    sp(420, "Cherubi", EVEN),
    sp(421, "Cherrim", EVEN),
    sp(422, "Shellos", EVEN),
    sp(423, "Gastrodon", EVEN),
    sp(424, "Ambipom", EVEN),
    sp(425, "Drifloon", EVEN),
    sp(426, "Drifblim", EVEN),
    sp(427, "Buneary", EVEN),
    sp(428, "Lopunny", EVEN),
    sp(429, "Mismagius", EVEN),
    sp(430, "Honchkrow", EVEN),
    sp(431, "Glameow", M1F3),
    sp(432, "Purugly", M1F3),
    sp(433, "Chingling", EVEN),
    sp(434, "Stunky", EVEN),
    sp(435, "Skuntank", EVEN),
    sp(436, "Bronzor", RATIO_GENDERLESS),
    sp(437, "Bronzong", RATIO_GENDERLESS),
    sp(438, "Bonsly", EVEN),
    sp(439, "Mime Jr.", EVEN),
    sp(440, "Happiny", RATIO_FEMALE_ONLY),
    sp(441, "Chatot", EVEN),
    sp(442, "Spiritomb", EVEN),
    sp(443, "Gible", EVEN),
    sp(444, "Gabite", EVEN),
    sp(445, "Garchomp", EVEN),
    sp(446, "Munchlax", M7F1),
    sp(447, "Riolu", M7F1),
    sp(448, "Lucario", M7F1),
    sp(449, "Hippopotas", EVEN),
    sp(450, "Hippowdon", EVEN),
    sp(451, "Skorupi", EVEN),
    sp(452, "Drapion", EVEN),
    sp(453, "Croagunk", EVEN),
    sp(454, "Toxicroak", EVEN),
    sp(455, "Carnivine", EVEN),
    sp(456, "Finneon", EVEN),
    sp(457, "Lumineon", EVEN),
    sp(458, "Mantyke", EVEN),
    sp(459, "Snover", EVEN),
    sp(460, "Abomasnow", EVEN),
    sp(461, "Weavile", EVEN),
    sp(462, "Magnezone", RATIO_GENDERLESS),
    sp(463, "Lickilicky", EVEN),
    sp(464, "Rhyperior", EVEN),
    sp(465, "Tangrowth", EVEN),
    sp(466, "Electivire", M3F1),
    sp(467, "Magmortar", M3F1),
    sp(468, "Togekiss", M7F1),
    sp(469, "Yanmega", EVEN),
    sp(470, "Leafeon", M7F1),
    sp(471, "Glaceon", M7F1),
    sp(472, "Gliscor", EVEN),
    sp(473, "Mamoswine", EVEN),
    sp(474, "Porygon-Z", RATIO_GENDERLESS),
    sp(475, "Gallade", RATIO_MALE_ONLY),
    sp(476, "Probopass", EVEN),
    sp(477, "Dusknoir", EVEN),
    sp(478, "Froslass", RATIO_FEMALE_ONLY),
    sp(479, "Rotom", RATIO_GENDERLESS),
    sp(480, "Uxie", RATIO_GENDERLESS),
    sp(481, "Mesprit", RATIO_GENDERLESS),
    sp(482, "Azelf", RATIO_GENDERLESS),
    sp(483, "Dialga", RATIO_GENDERLESS),
    sp(484, "Palkia", RATIO_GENDERLESS),
    sp(485, "Heatran", EVEN),
    sp(486, "Regigigas", RATIO_GENDERLESS),
    sp(487, "Giratina", RATIO_GENDERLESS),
    sp(488, "Cresselia", RATIO_FEMALE_ONLY),
    sp(489, "Phione", RATIO_GENDERLESS),
    sp(490, "Manaphy", RATIO_GENDERLESS),
    sp(491, "Darkrai", RATIO_GENDERLESS),
    sp(492, "Shaymin", RATIO_GENDERLESS),
    sp(493, "Arceus", RATIO_GENDERLESS),
    sp(501, "Oshawott", M7F1),
    sp(502, "Dewott", M7F1),
    sp(503, "Samurott", M7F1),
    sp(548, "Petilil", RATIO_FEMALE_ONLY),
    sp(549, "Lilligant", RATIO_FEMALE_ONLY),
    sp(550, "Basculin", EVEN),
    sp(570, "Zorua", M7F1),
    sp(571, "Zoroark", M7F1),
    sp(627, "Rufflet", RATIO_MALE_ONLY),
    sp(628, "Braviary", RATIO_MALE_ONLY),
    sp(641, "Tornadus", RATIO_MALE_ONLY),
    sp(642, "Thundurus", RATIO_MALE_ONLY),
    sp(645, "Landorus", RATIO_MALE_ONLY),
    sp(700, "Sylveon", M7F1),
    sp(704, "Goomy", EVEN),
    sp(705, "Sliggoo", EVEN),
    sp(706, "Goodra", EVEN),
    sp(712, "Bergmite", EVEN),
    sp(713, "Avalugg", EVEN),
    sp(722, "Rowlet", M7F1),
    sp(723, "Dartrix", M7F1),
    sp(724, "Decidueye", M7F1),
    sp(899, "Wyrdeer", EVEN),
    sp(900, "Kleavor", EVEN),
    sp(901, "Ursaluna", EVEN),
    sp(902, "Basculegion", EVEN),
    sp(903, "Sneasler", EVEN),
    sp(904, "Overqwil", EVEN),
    sp(905, "Enamorus", RATIO_FEMALE_ONLY),
];

/// Look up a species by national dex id
pub fn species_info(id: u16) -> Option<&'static SpeciesInfo> {
    CATALOG
        .binary_search_by_key(&id, |s| s.id)
        .ok()
        .map(|i| &CATALOG[i])
}

/// Look up a species by name (case-insensitive, ignores punctuation and spaces)
pub fn species_by_name(name: &str) -> Option<&'static SpeciesInfo> {
    let wanted = normalize_name(name);
    CATALOG.iter().find(|s| normalize_name(s.name) == wanted)
}

/// Display name for a species id, falling back to `#<id>` for uncatalogued species
pub fn species_name(id: u16) -> String {
    match species_info(id) {
        Some(info) => info.name.to_string(),
        None => format!("#{}", id),
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | ' ' | '_' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sorted_and_unique() {
        for pair in CATALOG.windows(2) {
            assert!(pair[0].id < pair[1].id, "{} before {}", pair[0].id, pair[1].id);
        }
    }

    #[test]
    fn test_catalog_covers_hisui_dex() {
        assert_eq!(CATALOG.len(), 242);
        for id in [399, 396, 403, 25, 899, 905, 493] {
            assert!(species_info(id).is_some(), "#{}", id);
        }
        assert_eq!(species_by_name("Bidoof").unwrap().id, 399);
        assert_eq!(species_by_name("mr mime").unwrap().id, 122);
    }

    #[test]
    fn test_lookup_by_id() {
        let info = species_info(215).unwrap();
        assert_eq!(info.name, "Sneasel");
        assert!(species_info(1).is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(species_by_name("weavile").unwrap().id, 461);
        assert_eq!(species_by_name("PorygonZ").unwrap().id, 474);
        assert_eq!(species_by_name("Porygon-Z").unwrap().id, 474);
        assert!(species_by_name("Missingno").is_none());
    }

    #[test]
    fn test_fixed_gender_species() {
        assert_eq!(species_info(414).unwrap().gender_ratio, RATIO_MALE_ONLY);
        assert_eq!(species_info(478).unwrap().gender_ratio, RATIO_FEMALE_ONLY);
        assert_eq!(species_info(137).unwrap().gender_ratio, RATIO_GENDERLESS);
    }

    #[test]
    fn test_species_name_fallback() {
        assert_eq!(species_name(143), "Snorlax");
        assert_eq!(species_name(999), "#999");
    }
}
