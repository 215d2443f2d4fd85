//! Fixed protocol constants, persisted-settings keys, and the bundled
//! pre-hidden font list.

use std::time::Duration;

/// Settings-store keys shared between the core and the panel layer.
pub mod keys {
    /// Sorted list of hidden family names; full-replace on every hide/show.
    pub const HIDDEN_FONTS: &str = "hiddenFonts";
    /// Last collection the user picked in the panel. Read-only for the core.
    pub const SELECTED_COLLECTION: &str = "selectedCollection";
    /// Guards the one-time first-launch tasks (pre-hidden seeding, consent
    /// prompt).
    pub const HAS_LAUNCHED_BEFORE: &str = "appHasPreviouslyLaunched";
}

/// Wait after a synthesized copy or paste for the foreign application's
/// asynchronous clipboard write to land. No completion signal exists to
/// observe, so this is a fixed heuristic.
pub const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Virtual key code for `C` on ANSI layouts.
pub const COPY_KEY_CODE: u16 = 8;

/// Virtual key code for `V` on ANSI layouts.
pub const PASTE_KEY_CODE: u16 = 9;

/// Collection names carrying this substring belong to the OS and are never
/// shown to the user.
pub const RESERVED_COLLECTION_NAMESPACE: &str = "com.apple";

/// Symbol and ornament families hidden by default alongside
/// [`PRE_HIDDEN_FONTS`].
pub const SPECIAL_FONTS: &[&str] = &[
    "Bodoni Ornaments",
    "Webdings",
    "Wingdings",
    "Wingdings 2",
    "Wingdings 3",
    "Zapf Dingbats",
    "Zapfino",
];

/// System families hidden on first launch to keep the picker usable.
/// Intersected with the installed families before seeding, so entries that
/// are not installed are simply skipped.
pub const PRE_HIDDEN_FONTS: &[&str] = &[
    "Academy Engraved LET",
    "Al Bayan",
    "Al Nile",
    "Al Tarikh",
    "American Typewriter",
    "Apple Braille",
    "Apple Chancery",
    "Apple Color Emoji",
    "Apple SD Gothic Neo",
    "Apple Symbols",
    "AppleGothic",
    "AppleMyungjo",
    "Arial Black",
    "Arial Hebrew",
    "Arial Hebrew Scholar",
    "Arial Narrow",
    "Arial Rounded MT Bold",
    "Arial Unicode MS",
    "Ayuthaya",
    "Baghdad",
    "Bangla MN",
    "Bangla Sangam MN",
    "Beirut",
    "Bradley Hand",
    "Brush Script MT",
    "Chalkboard",
    "Chalkboard SE",
    "Chalkduster",
    "Comic Sans MS",
    "Copperplate",
    "Corsiva Hebrew",
    "DIN Alternate",
    "DIN Condensed",
    "Damascus",
    "DecoType Naskh",
    "Devanagari MT",
    "Devanagari Sangam MN",
    "Diwan Kufi",
    "Diwan Thuluth",
    "Euphemia UCAS",
    "Farah",
    "Farisi",
    "GB18030 Bitmap",
    "Galvji",
    "Geeza Pro",
    "Geneva",
    "Grantha Sangam MN",
    "Gujarati MT",
    "Gujarati Sangam MN",
    "Gurmukhi MN",
    "Gurmukhi MT",
    "Gurmukhi Sangam MN",
    "Heiti SC",
    "Heiti TC",
    "Herculanum",
    "Hiragino Maru Gothic ProN",
    "Hiragino Mincho ProN",
    "Hiragino Sans",
    "Hiragino Sans GB",
    "ITF Devanagari",
    "ITF Devanagari Marathi",
    "Impact",
    "InaiMathi",
    "Kailasa",
    "Kannada MN",
    "Kannada Sangam MN",
    "Kefa",
    "Khmer MN",
    "Khmer Sangam MN",
    "Kohinoor Bangla",
    "Kohinoor Devanagari",
    "Kohinoor Gujarati",
    "Kohinoor Telugu",
    "Kokonor",
    "Krungthep",
    "KufiStandardGK",
    "Lao MN",
    "Lao Sangam MN",
    "Luminari",
    "Malayalam MN",
    "Malayalam Sangam MN",
    "Marker Felt",
    "Microsoft Sans Serif",
    "Mishafi",
    "Mishafi Gold",
    "Monaco",
    "Mshtakan",
    "Mukta Mahee",
    "Muna",
    "Myanmar MN",
    "Myanmar Sangam MN",
    "Nadeem",
    "New Peninim MT",
    "Noteworthy",
    "Noto Nastaliq Urdu",
    "Noto Sans Batak",
    "Noto Sans Kannada",
    "Noto Sans Myanmar",
    "Noto Sans NKo",
    "Noto Sans Oriya",
    "Noto Sans Tagalog",
    "Noto Serif Myanmar",
    "Oriya MN",
    "Oriya Sangam MN",
    "Papyrus",
    "Party LET",
    "PingFang HK",
    "PingFang SC",
    "PingFang TC",
    "Plantagenet Cherokee",
    "Raanana",
    "STIX Two Math",
    "STIX Two Text",
    "STIXGeneral",
    "STSong",
    "Sana",
    "Sathu",
    "Savoye LET",
    "Shree Devanagari 714",
    "SignPainter",
    "Silom",
    "Sinhala MN",
    "Sinhala Sangam MN",
    "Snell Roundhand",
    "Songti SC",
    "Songti TC",
    "Sukhumvit Set",
    "Symbol",
    "Tahoma",
    "Tamil MN",
    "Tamil Sangam MN",
    "Telugu MN",
    "Telugu Sangam MN",
    "Thonburi",
    "Trattatello",
    "Trebuchet MS",
    "Verdana",
    "Waseem",
];

/// All families hidden by default: the pre-hidden list plus the symbol
/// fonts.
pub fn default_hidden_fonts() -> impl Iterator<Item = &'static str> {
    PRE_HIDDEN_FONTS.iter().chain(SPECIAL_FONTS.iter()).copied()
}
