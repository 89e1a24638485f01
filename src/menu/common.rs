use bevy::prelude::*;

pub(super) fn start_bg() -> Color {
    Color::srgb(0.08, 0.36, 0.14)
}
pub(super) fn start_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
pub(super) fn start_text() -> Color {
    Color::srgb(0.75, 1.0, 0.80)
}
pub(super) fn quit_bg() -> Color {
    Color::srgb(0.28, 0.06, 0.06)
}
pub(super) fn quit_border() -> Color {
    Color::srgb(0.60, 0.12, 0.12)
}
pub(super) fn quit_text() -> Color {
    Color::srgb(1.0, 0.65, 0.65)
}
pub(super) fn title_color() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}
pub(super) fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}
pub(super) fn hint_color() -> Color {
    Color::srgb(0.28, 0.28, 0.35)
}

pub(super) fn veil_color() -> Color {
    Color::srgba(0.0, 0.0, 0.0, 0.82)
}
pub(super) fn game_over_card_bg() -> Color {
    Color::srgb(0.06, 0.02, 0.02)
}
pub(super) fn game_over_card_border() -> Color {
    Color::srgb(0.55, 0.10, 0.10)
}
pub(super) fn game_over_title() -> Color {
    Color::srgb(1.0, 0.22, 0.22)
}
pub(super) fn finish_card_bg() -> Color {
    Color::srgb(0.02, 0.06, 0.04)
}
pub(super) fn finish_card_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
pub(super) fn finish_title() -> Color {
    Color::srgb(0.45, 1.0, 0.60)
}

pub(super) fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

/// Centred card node used by both end screens.
pub(super) fn card_node() -> Node {
    Node {
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        padding: UiRect::all(Val::Px(40.0)),
        row_gap: Val::Px(16.0),
        border: UiRect::all(Val::Px(2.0)),
        min_width: Val::Px(320.0),
        ..default()
    }
}

/// Full-screen absolute node that centres its children.
pub(super) fn overlay_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        position_type: PositionType::Absolute,
        left: Val::Px(0.0),
        top: Val::Px(0.0),
        ..default()
    }
}
