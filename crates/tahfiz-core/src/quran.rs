//! Static Quran structure metadata.
//!
//! Read-only curriculum tables consumed by aggregation queries: ayah counts
//! and names for all 114 surahs, and the 30 juz boundaries. Scheduling
//! decisions never depend on this module.

use crate::item::VerseId;

/// Total ayah count across the whole mushaf.
pub const TOTAL_VERSES: u32 = 6236;

pub const SURAH_COUNT: u16 = 114;
pub const JUZ_COUNT: u8 = 30;

/// Ayah counts indexed by `surah - 1`.
const AYAH_COUNTS: [u16; 114] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99, 128, 111, 110, 98, 135,
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34, 30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53,
    89, 59, 37, 35, 38, 29, 18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19, 36, 25, 22, 17, 19, 26,
    30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11, 11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

/// Transliterated names indexed by `surah - 1`.
const SURAH_NAMES: [&str; 114] = [
    "Al-Faatiha", "Al-Baqara", "Aal-i-Imraan", "An-Nisaa", "Al-Maaida", "Al-An'aam", "Al-A'raaf",
    "Al-Anfaal", "At-Tawba", "Yunus", "Hud", "Yusuf", "Ar-Ra'd", "Ibrahim", "Al-Hijr", "An-Nahl",
    "Al-Israa", "Al-Kahf", "Maryam", "Taa-Haa", "Al-Anbiyaa", "Al-Hajj", "Al-Muminoon", "An-Noor",
    "Al-Furqaan", "Ash-Shu'araa", "An-Naml", "Al-Qasas", "Al-Ankaboot", "Ar-Room", "Luqmaan",
    "As-Sajda", "Al-Ahzaab", "Saba", "Faatir", "Yaseen", "As-Saaffaat", "Saad", "Az-Zumar",
    "Ghafir", "Fussilat", "Ash-Shooraa", "Az-Zukhruf", "Ad-Dukhaan", "Al-Jaathiya", "Al-Ahqaf",
    "Muhammad", "Al-Fath", "Al-Hujuraat", "Qaaf", "Adh-Dhaariyat", "At-Tur", "An-Najm",
    "Al-Qamar", "Ar-Rahmaan", "Al-Waaqia", "Al-Hadid", "Al-Mujaadila", "Al-Hashr", "Al-Mumtahana",
    "As-Saff", "Al-Jumu'a", "Al-Munaafiqoon", "At-Taghaabun", "At-Talaaq", "At-Tahrim", "Al-Mulk",
    "Al-Qalam", "Al-Haaqqa", "Al-Ma'aarij", "Nooh", "Al-Jinn", "Al-Muzzammil", "Al-Muddaththir",
    "Al-Qiyaama", "Al-Insaan", "Al-Mursalaat", "An-Naba", "An-Naazi'aat", "Abasa", "At-Takwir",
    "Al-Infitaar", "Al-Mutaffifin", "Al-Inshiqaaq", "Al-Burooj", "At-Taariq", "Al-A'laa",
    "Al-Ghaashiya", "Al-Fajr", "Al-Balad", "Ash-Shams", "Al-Layl", "Ad-Dhuhaa", "Ash-Sharh",
    "At-Tin", "Al-Alaq", "Al-Qadr", "Al-Bayyina", "Az-Zalzala", "Al-Aadiyaat", "Al-Qaari'a",
    "At-Takaathur", "Al-Asr", "Al-Humaza", "Al-Fil", "Quraysh", "Al-Maa'un", "Al-Kawthar",
    "Al-Kaafiroon", "An-Nasr", "Al-Masad", "Al-Ikhlaas", "Al-Falaq", "An-Naas",
];

/// One juz as an inclusive verse range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JuzRange {
    pub juz: u8,
    pub start: VerseId,
    pub end: VerseId,
}

macro_rules! juz {
    ($n:expr, $ss:expr, $sa:expr, $es:expr, $ea:expr) => {
        JuzRange {
            juz: $n,
            start: VerseId { surah: $ss, ayah: $sa },
            end: VerseId { surah: $es, ayah: $ea },
        }
    };
}

/// Juz boundaries, indexed by `juz - 1`.
const JUZ_RANGES: [JuzRange; 30] = [
    juz!(1, 1, 1, 2, 141),
    juz!(2, 2, 142, 2, 252),
    juz!(3, 2, 253, 3, 92),
    juz!(4, 3, 93, 4, 23),
    juz!(5, 4, 24, 4, 147),
    juz!(6, 4, 148, 5, 81),
    juz!(7, 5, 82, 6, 110),
    juz!(8, 6, 111, 7, 87),
    juz!(9, 7, 88, 8, 40),
    juz!(10, 8, 41, 9, 92),
    juz!(11, 9, 93, 11, 5),
    juz!(12, 11, 6, 12, 52),
    juz!(13, 12, 53, 14, 52),
    juz!(14, 15, 1, 16, 128),
    juz!(15, 17, 1, 18, 74),
    juz!(16, 18, 75, 20, 135),
    juz!(17, 21, 1, 22, 78),
    juz!(18, 23, 1, 25, 20),
    juz!(19, 25, 21, 27, 55),
    juz!(20, 27, 56, 29, 45),
    juz!(21, 29, 46, 33, 30),
    juz!(22, 33, 31, 36, 27),
    juz!(23, 36, 28, 39, 31),
    juz!(24, 39, 32, 41, 46),
    juz!(25, 41, 47, 45, 37),
    juz!(26, 46, 1, 51, 30),
    juz!(27, 51, 31, 57, 29),
    juz!(28, 58, 1, 66, 12),
    juz!(29, 67, 1, 77, 50),
    juz!(30, 78, 1, 114, 6),
];

/// Ayah count for a surah, or None for an out-of-range surah number.
pub fn ayah_count(surah: u16) -> Option<u16> {
    if (1..=SURAH_COUNT).contains(&surah) {
        Some(AYAH_COUNTS[usize::from(surah - 1)])
    } else {
        None
    }
}

/// Transliterated surah name.
pub fn surah_name(surah: u16) -> Option<&'static str> {
    if (1..=SURAH_COUNT).contains(&surah) {
        Some(SURAH_NAMES[usize::from(surah - 1)])
    } else {
        None
    }
}

/// Whether a (surah, ayah) pair exists in the mushaf.
pub fn is_valid(id: VerseId) -> bool {
    matches!(ayah_count(id.surah), Some(count) if (1..=count).contains(&id.ayah))
}

/// Boundaries of a juz.
pub fn juz_range(juz: u8) -> Option<JuzRange> {
    if (1..=JUZ_COUNT).contains(&juz) {
        Some(JUZ_RANGES[usize::from(juz - 1)])
    } else {
        None
    }
}

/// Which juz a verse belongs to.
pub fn juz_for(id: VerseId) -> Option<u8> {
    JUZ_RANGES
        .iter()
        .find(|range| range.contains(id))
        .map(|range| range.juz)
}

impl JuzRange {
    /// Whether a verse falls inside this juz.
    pub fn contains(&self, id: VerseId) -> bool {
        is_valid(id) && id >= self.start && id <= self.end
    }

    /// All verses of the juz in mushaf order.
    pub fn verses(&self) -> impl Iterator<Item = VerseId> + '_ {
        (self.start.surah..=self.end.surah).flat_map(move |surah| {
            let first = if surah == self.start.surah { self.start.ayah } else { 1 };
            let last = if surah == self.end.surah {
                self.end.ayah
            } else {
                ayah_count(surah).unwrap_or(0)
            };
            (first..=last).map(move |ayah| VerseId::new(surah, ayah))
        })
    }
}

/// All verses of a surah in order.
pub fn surah_verses(surah: u16) -> impl Iterator<Item = VerseId> {
    (1..=ayah_count(surah).unwrap_or(0)).map(move |ayah| VerseId::new(surah, ayah))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_verse_count() {
        let sum: u32 = AYAH_COUNTS.iter().map(|&c| u32::from(c)).sum();
        assert_eq!(sum, TOTAL_VERSES);
    }

    #[test]
    fn test_ayah_count_bounds() {
        assert_eq!(ayah_count(1), Some(7));
        assert_eq!(ayah_count(2), Some(286));
        assert_eq!(ayah_count(114), Some(6));
        assert_eq!(ayah_count(0), None);
        assert_eq!(ayah_count(115), None);
    }

    #[test]
    fn test_surah_names() {
        assert_eq!(surah_name(1), Some("Al-Faatiha"));
        assert_eq!(surah_name(36), Some("Yaseen"));
        assert_eq!(surah_name(114), Some("An-Naas"));
        assert_eq!(surah_name(0), None);
    }

    #[test]
    fn test_validity() {
        assert!(is_valid(VerseId::new(2, 255)));
        assert!(is_valid(VerseId::new(1, 7)));
        assert!(!is_valid(VerseId::new(1, 8)));
        assert!(!is_valid(VerseId::new(1, 0)));
        assert!(!is_valid(VerseId::new(115, 1)));
    }

    #[test]
    fn test_juz_lookup() {
        assert_eq!(juz_for(VerseId::new(1, 1)), Some(1));
        assert_eq!(juz_for(VerseId::new(2, 141)), Some(1));
        assert_eq!(juz_for(VerseId::new(2, 142)), Some(2));
        assert_eq!(juz_for(VerseId::new(78, 1)), Some(30));
        assert_eq!(juz_for(VerseId::new(114, 6)), Some(30));
        assert_eq!(juz_for(VerseId::new(115, 1)), None);
    }

    #[test]
    fn test_juz_ranges_tile_the_mushaf() {
        // Every valid verse belongs to exactly one juz, and the per-juz
        // iterators together cover the whole mushaf.
        let total: usize = (1..=JUZ_COUNT)
            .map(|j| juz_range(j).unwrap().verses().count())
            .sum();
        assert_eq!(total as u32, TOTAL_VERSES);

        for juz in 1..=JUZ_COUNT {
            let range = juz_range(juz).unwrap();
            for verse in range.verses() {
                assert!(is_valid(verse), "juz {juz} produced invalid {verse}");
                assert_eq!(juz_for(verse), Some(juz));
            }
        }
    }

    #[test]
    fn test_surah_verses_iterator() {
        let verses: Vec<_> = surah_verses(103).collect();
        assert_eq!(
            verses,
            vec![VerseId::new(103, 1), VerseId::new(103, 2), VerseId::new(103, 3)]
        );
        assert_eq!(surah_verses(200).count(), 0);
    }
}
