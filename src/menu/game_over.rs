use super::*;

/// Spawn the game-over veil and card, fully transparent until the player is
/// down.
pub(super) fn setup_game_over_overlay(mut commands: Commands) {
    commands
        .spawn((
            overlay_node(),
            BackgroundColor(Color::NONE),
            Fade::new(FadeChannel::Veil, veil_color()),
            ZIndex(300),
            EndScreenRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    card_node(),
                    BackgroundColor(Color::NONE),
                    BorderColor::all(Color::NONE),
                    Fade::new(FadeChannel::GameOverPanel, game_over_card_bg())
                        .with_border(game_over_card_border()),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("GAME OVER"),
                        TextFont {
                            font_size: 46.0,
                            ..default()
                        },
                        TextColor(Color::NONE),
                        Fade::new(FadeChannel::GameOverPanel, game_over_title()),
                    ));

                    spacer(card, 4.0);

                    card.spawn((
                        Text::new("Press R to retry  ·  Esc for menu"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::NONE),
                        Fade::new(FadeChannel::GameOverPanel, subtitle_color()),
                    ));
                });
        });
}
