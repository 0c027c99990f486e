//! Static advice shown next to every municipality profile.

pub const QASA_SAFETY_ADVICE: &[&str] = &[
    "Betala inte pengar innan du har sett bostaden och fått tydligt avtal.",
    "Håll kommunikationen i plattformen när det går.",
    "Var försiktig om någon vill flytta kontakten till WhatsApp/privat direkt.",
];

pub const SEARCH_STEPS: &[&str] = &[
    "Välj en kommun i listan.",
    "Klicka på länkarna (hyresvärdar + portaler).",
    "Registrera konto (om det behövs) och gör intresseanmälan.",
    "Följ upp regelbundet – många bostäder ligger ute kort tid.",
];

pub const APPLICATION_CHECKLIST: &[&str] = &[
    "E-post och mobilnummer",
    "BankID (om du har)",
    "Personnummer/samordningsnummer (om du har)",
    "Inkomstuppgifter (lön, etablering, bidrag)",
    "Referenser och dokument (om hyresvärden ber om det)",
];

pub const BOPLATS_UNAVAILABLE_NOTE: &str = "Boplats: ej i deras kommun-lista";
