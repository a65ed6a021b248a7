//! User-visible reply text and the help menu

use crate::commands::{CommandAction, CommandTable};
use majlis_ipc::{MenuButton, MenuPage, OutboundReply};
use majlis_scores::ScoreEntry;

pub const APOLOGY_TEXT: &str = "عذراً، حدث خطأ أثناء تنفيذ طلبك. حاول مرة أخرى 🙏";
pub const EMPTY_CONTENT_TEXT: &str = "عذراً، لا يوجد محتوى متاح حالياً 🙏";
pub const NO_SCORES_TEXT: &str = "لا توجد نقاط بعد! ابدأ اللعب لتظهر في لوحة الصدارة 🏆";
pub const LEADERBOARD_HEADER: &str = "🏆 لوحة الصدارة";
pub const MENU_ALT_TEXT: &str = "قائمة الأوامر";
pub const LEADERBOARD_SIZE: usize = 5;
const MENU_PAGE_SIZE: usize = 3;
const RANK_MARKERS: [&str; LEADERBOARD_SIZE] = ["🥇", "🥈", "🥉", "4️⃣", "5️⃣"];
const DISPLAY_ID_CHARS: usize = 8;

pub fn points_text(total: u64) -> String {
    format!("⭐ نقاطك الحالية: {} نقطة", total)
}

pub fn analysis_text(personality_trait: &str, points: u64) -> String {
    format!("🔮 تحليل شخصيتك:\n\n{}\n\n+{} نقاط", personality_trait, points)
}

/// Opaque ids are long; show a prefix only.
pub fn display_user_id(user_id: &str) -> String {
    if user_id.chars().count() <= DISPLAY_ID_CHARS {
        return user_id.to_string();
    }
    let mut short: String = user_id.chars().take(DISPLAY_ID_CHARS).collect();
    short.push('…');
    short
}

pub fn leaderboard_text(entries: &[ScoreEntry]) -> String {
    if entries.is_empty() {
        return NO_SCORES_TEXT.to_string();
    }

    let mut lines = vec![LEADERBOARD_HEADER.to_string(), String::new()];
    for (marker, entry) in RANK_MARKERS.iter().zip(entries) {
        lines.push(format!(
            "{} {} — {} نقطة",
            marker,
            display_user_id(&entry.user_id),
            entry.points
        ));
    }
    lines.join("\n")
}

/// Paginated button menu of every command except help itself.
pub fn help_menu(table: &CommandTable) -> OutboundReply {
    let buttons: Vec<MenuButton> = table
        .commands()
        .iter()
        .filter(|spec| spec.action != CommandAction::Help)
        .map(|spec| MenuButton::new(spec.label, spec.keyword))
        .collect();

    let page_count = buttons.len().div_ceil(MENU_PAGE_SIZE);
    let pages = buttons
        .chunks(MENU_PAGE_SIZE)
        .enumerate()
        .map(|(i, chunk)| MenuPage {
            title: format!("📋 القائمة ({}/{})", i + 1, page_count),
            buttons: chunk.to_vec(),
        })
        .collect();

    OutboundReply::Menu {
        alt_text: MENU_ALT_TEXT.to_string(),
        pages,
    }
}
