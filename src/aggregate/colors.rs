/// Color for languages missing from the table.
pub const FALLBACK_COLOR: &str = "#8b949e";

// Sourced from GitHub linguist's languages.yml.
const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#3178c6"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C", "#555555"),
    ("C++", "#f34b7d"),
    ("C#", "#178600"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Ruby", "#701516"),
    ("PHP", "#4F5D95"),
    ("Swift", "#F05138"),
    ("Kotlin", "#A97BFF"),
    ("Dart", "#00B4AB"),
    ("Scala", "#c22d40"),
    ("Shell", "#89e051"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("SCSS", "#c6538c"),
    ("Vue", "#41b883"),
    ("Svelte", "#ff3e00"),
    ("Lua", "#000080"),
    ("Haskell", "#5e5086"),
    ("Elixir", "#6e4a7e"),
    ("Clojure", "#db5855"),
    ("Objective-C", "#438eff"),
    ("Perl", "#0298c3"),
    ("R", "#198CE7"),
    ("Jupyter Notebook", "#DA5B0B"),
    ("Makefile", "#427819"),
    ("Dockerfile", "#384d54"),
    ("Nix", "#7e7eff"),
    ("Zig", "#ec915c"),
    ("Assembly", "#6E4C13"),
];

/// Display color for a language name. Matching is exact, as GitHub spells it.
pub fn language_color(name: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(lang, _)| *lang == name)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}
