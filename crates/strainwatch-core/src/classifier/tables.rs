//! Built-in lookup tables for the context classifier.

use super::category::WorkloadCategory::{self, Communication, Entertainment, Other, Work};

/// Process names (lowercase, no extension) treated as web browsers.
pub const BROWSERS: &[&str] = &[
    "chrome",
    "chromium",
    "msedge",
    "firefox",
    "brave",
    "opera",
    "vivaldi",
    "safari",
    "arc",
    "waterfox",
    "librewolf",
    "zen",
];

/// Domain fragment -> human name, used to enrich classification text.
pub const SITE_NAMES: &[(&str, &str)] = &[
    ("docs.google.com", "Google Docs"),
    ("sheets.google.com", "Google Sheets"),
    ("mail.google.com", "Gmail"),
    ("meet.google.com", "Google Meet"),
    ("github.com", "GitHub"),
    ("gitlab.com", "GitLab"),
    ("stackoverflow.com", "Stack Overflow"),
    ("notion.so", "Notion"),
    ("figma.com", "Figma"),
    ("atlassian.net", "Jira"),
    ("youtube.com", "YouTube"),
    ("youtu.be", "YouTube"),
    ("netflix.com", "Netflix"),
    ("twitch.tv", "Twitch"),
    ("bilibili.com", "Bilibili"),
    ("reddit.com", "Reddit"),
    ("slack.com", "Slack"),
    ("discord.com", "Discord"),
    ("teams.microsoft.com", "Microsoft Teams"),
    ("outlook.live.com", "Outlook"),
    ("web.whatsapp.com", "WhatsApp"),
];

/// Keyword -> category for browser contexts. Matched longest-first.
pub const SITE_KEYWORDS: &[(&str, WorkloadCategory)] = &[
    ("google", Other),
    ("docs.google", Work),
    ("sheets.google", Work),
    ("slides.google", Work),
    ("drive.google", Work),
    ("google docs", Work),
    ("google sheets", Work),
    ("mail.google", Communication),
    ("meet.google", Communication),
    ("gmail", Communication),
    ("github", Work),
    ("gitlab", Work),
    ("stackoverflow", Work),
    ("stack overflow", Work),
    ("docs.rs", Work),
    ("crates.io", Work),
    ("jira", Work),
    ("confluence", Work),
    ("atlassian", Work),
    ("notion", Work),
    ("figma", Work),
    ("localhost", Work),
    ("youtube", Entertainment),
    ("youtu.be", Entertainment),
    ("netflix", Entertainment),
    ("twitch", Entertainment),
    ("bilibili", Entertainment),
    ("reddit", Entertainment),
    ("instagram", Entertainment),
    ("tiktok", Entertainment),
    ("spotify", Entertainment),
    ("disneyplus", Entertainment),
    ("slack", Communication),
    ("discord", Communication),
    ("teams.microsoft", Communication),
    ("outlook", Communication),
    ("whatsapp", Communication),
    ("telegram", Communication),
    ("zoom.us", Communication),
];

/// Exact process name (lowercase, no extension) -> category.
pub const APPLICATIONS: &[(&str, WorkloadCategory)] = &[
    ("code", Work),
    ("cursor", Work),
    ("devenv", Work),
    ("idea64", Work),
    ("idea", Work),
    ("pycharm64", Work),
    ("clion64", Work),
    ("rider64", Work),
    ("webstorm64", Work),
    ("goland64", Work),
    ("rustrover64", Work),
    ("sublime_text", Work),
    ("notepad++", Work),
    ("vim", Work),
    ("nvim", Work),
    ("emacs", Work),
    ("zed", Work),
    ("windowsterminal", Work),
    ("powershell", Work),
    ("pwsh", Work),
    ("cmd", Work),
    ("alacritty", Work),
    ("wezterm-gui", Work),
    ("kitty", Work),
    ("iterm2", Work),
    ("terminal", Work),
    ("winword", Work),
    ("excel", Work),
    ("powerpnt", Work),
    ("onenote", Work),
    ("obsidian", Work),
    ("notion", Work),
    ("figma", Work),
    ("blender", Work),
    ("photoshop", Work),
    ("slack", Communication),
    ("discord", Communication),
    ("teams", Communication),
    ("ms-teams", Communication),
    ("zoom", Communication),
    ("telegram", Communication),
    ("wechat", Communication),
    ("outlook", Communication),
    ("olk", Communication),
    ("thunderbird", Communication),
    ("whatsapp", Communication),
    ("skype", Communication),
    ("signal", Communication),
    ("spotify", Entertainment),
    ("vlc", Entertainment),
    ("potplayer", Entertainment),
    ("potplayermini64", Entertainment),
    ("mpv", Entertainment),
    ("steam", Entertainment),
    ("epicgameslauncher", Entertainment),
    ("netflix", Entertainment),
    ("music", Entertainment),
    ("itunes", Entertainment),
];

/// Substring heuristics applied when the exact table misses, in order.
pub const APPLICATION_HINTS: &[(&str, WorkloadCategory)] = &[
    ("jetbrains", Work),
    ("visualstudio", Work),
    ("studio", Work),
    ("terminal", Work),
    ("player", Entertainment),
    ("game", Entertainment),
    ("chat", Communication),
    ("mail", Communication),
    ("messenger", Communication),
];
