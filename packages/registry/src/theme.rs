//! Named color palettes. A project stores only the palette key; unknown keys
//! fall back to [`DEFAULT_THEME`].

use serde::Serialize;

pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Light,
    Dark,
}

/// Style-class bundle of one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub key: &'static str,
    pub tone: Tone,
    pub bg: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub secondary: &'static str,
    pub muted: &'static str,
}

macro_rules! palette {
    ($key:literal, $tone:ident, $bg:literal, $text:literal, $border:literal, $accent:literal, $secondary:literal, $muted:literal) => {
        Palette {
            key: $key,
            tone: Tone::$tone,
            bg: $bg,
            text: $text,
            border: $border,
            accent: $accent,
            secondary: $secondary,
            muted: $muted,
        }
    };
}

pub const PALETTES: &[Palette] = &[
    palette!("light", Light, "bg-white", "text-gray-900", "border-gray-200", "bg-black text-white hover:bg-neutral-800", "bg-gray-50", "text-gray-500"),
    palette!("corporate", Light, "bg-slate-50", "text-slate-900", "border-slate-300", "bg-blue-700 text-white hover:bg-blue-800", "bg-white", "text-slate-500"),
    palette!("gray", Light, "bg-gray-50", "text-gray-900", "border-gray-300", "bg-gray-900 text-white hover:bg-black", "bg-gray-200", "text-gray-600"),
    palette!("retro", Light, "bg-[#FFF8E7]", "text-[#4A403A]", "border-[#D4C5B0]", "bg-[#E07A5F] text-white hover:bg-[#D0654C]", "bg-[#F4E4BC]", "text-[#9A8C7D]"),
    palette!("lavender", Light, "bg-violet-50", "text-violet-950", "border-violet-200", "bg-violet-600 text-white hover:bg-violet-700", "bg-violet-100", "text-violet-700"),
    palette!("mint", Light, "bg-emerald-50", "text-emerald-950", "border-emerald-200", "bg-emerald-600 text-white hover:bg-emerald-700", "bg-emerald-100", "text-emerald-700"),
    palette!("peach", Light, "bg-orange-50", "text-orange-950", "border-orange-200", "bg-orange-600 text-white hover:bg-orange-700", "bg-orange-100", "text-orange-700"),
    palette!("sunset", Light, "bg-rose-50", "text-rose-950", "border-rose-200", "bg-amber-500 text-white hover:bg-amber-600", "bg-rose-100", "text-rose-700"),
    palette!("aqua", Light, "bg-cyan-50", "text-cyan-950", "border-cyan-200", "bg-cyan-600 text-white hover:bg-cyan-700", "bg-cyan-100", "text-cyan-700"),
    palette!("forest", Light, "bg-stone-50", "text-stone-900", "border-stone-300", "bg-emerald-700 text-white hover:bg-emerald-800", "bg-stone-200", "text-stone-600"),
    palette!("dark", Dark, "bg-[#0A0A0A]", "text-gray-200", "border-white/5", "bg-white text-black hover:bg-gray-200", "bg-[#0F0F0F]", "text-gray-500"),
    palette!("cyber", Dark, "bg-neutral-950", "text-neutral-100", "border-neutral-800", "bg-cyan-500 text-black hover:bg-cyan-400", "bg-neutral-900", "text-neutral-400"),
    palette!("midnight", Dark, "bg-slate-950", "text-slate-100", "border-slate-800", "bg-indigo-500 text-white hover:bg-indigo-600", "bg-slate-900", "text-slate-400"),
    palette!("obsidian", Dark, "bg-[#050505]", "text-gray-300", "border-white/10", "bg-purple-600 text-white hover:bg-purple-500", "bg-[#121212]", "text-gray-600"),
    palette!("terminal", Dark, "bg-black", "text-green-400", "border-green-900", "bg-green-600 text-black hover:bg-green-500", "bg-zinc-900", "text-green-700"),
    palette!("luxury", Dark, "bg-[#1A1A1A]", "text-[#D4AF37]", "border-[#D4AF37]/20", "bg-[#D4AF37] text-black hover:bg-[#C5A028]", "bg-[#222]", "text-[#888]"),
    palette!("deep_space", Dark, "bg-[#0F172A]", "text-blue-100", "border-blue-900", "bg-blue-500 text-white hover:bg-blue-600", "bg-[#1E293B]", "text-blue-400"),
    palette!("crimson", Dark, "bg-[#1a0505]", "text-red-100", "border-red-900/30", "bg-red-600 text-white hover:bg-red-700", "bg-[#2b0a0a]", "text-red-400"),
    palette!("dracula", Dark, "bg-[#282a36]", "text-[#f8f8f2]", "border-[#6272a4]", "bg-[#ff79c6] text-[#282a36] hover:bg-[#bd93f9]", "bg-[#44475a]", "text-[#6272a4]"),
    palette!("neon", Dark, "bg-black", "text-white", "border-fuchsia-500", "bg-fuchsia-600 text-white hover:bg-fuchsia-500", "bg-neutral-900", "text-fuchsia-300"),
];

/// Palette registered under `key`
pub fn find_palette(key: &str) -> Option<&'static Palette> {
    PALETTES.iter().find(|p| p.key == key)
}

/// Palette for `key`, or the default palette when the key is unknown
pub fn palette_or_default(key: &str) -> &'static Palette {
    find_palette(key)
        .or_else(|| find_palette(DEFAULT_THEME))
        .unwrap_or(&PALETTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_theme() {
        let p = palette_or_default("dracula");
        assert_eq!(p.key, "dracula");
        assert_eq!(p.tone, Tone::Dark);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(palette_or_default("sepia").key, DEFAULT_THEME);
        assert_eq!(palette_or_default("").key, DEFAULT_THEME);
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, p) in PALETTES.iter().enumerate() {
            assert!(PALETTES[i + 1..].iter().all(|q| q.key != p.key), "{}", p.key);
        }
    }
}
