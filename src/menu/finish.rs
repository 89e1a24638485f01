use super::*;

/// Spawn the finish card.  No veil: the shaft stays visible behind it.
pub(super) fn setup_finish_overlay(mut commands: Commands) {
    commands
        .spawn((overlay_node(), ZIndex(310), EndScreenRoot))
        .with_children(|overlay| {
            overlay
                .spawn((
                    card_node(),
                    BackgroundColor(Color::NONE),
                    BorderColor::all(Color::NONE),
                    Fade::new(FadeChannel::FinishPanel, finish_card_bg())
                        .with_border(finish_card_border()),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new("FINISH!"),
                        TextFont {
                            font_size: 46.0,
                            ..default()
                        },
                        TextColor(Color::NONE),
                        Fade::new(FadeChannel::FinishPanel, finish_title()),
                    ));

                    card.spawn((
                        Text::new("Time: 0.00 s"),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(Color::NONE),
                        Fade::new(FadeChannel::FinishPanel, title_color()),
                        FinishTimeText,
                    ));

                    spacer(card, 4.0);

                    card.spawn((
                        Text::new("Press R to run again  ·  Esc for menu"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::NONE),
                        Fade::new(FadeChannel::FinishPanel, hint_color()),
                    ));
                });
        });
}
