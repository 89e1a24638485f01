use super::*;

/// Spawn the full-screen start screen.
///
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │               BOOSTFALL                     │
/// │      Fall. Collect. Boost back up.          │
/// │                                             │
/// │             [ START ]                       │
/// │             [ QUIT  ]                       │
/// │                                             │
/// │  A/D move · Space boost · R restart         │
/// └─────────────────────────────────────────────┘
/// ```
pub(super) fn setup_main_menu(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::BLACK),
            MainMenuRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("BOOSTFALL"),
                TextFont {
                    font_size: 56.0,
                    ..default()
                },
                TextColor(title_color()),
            ));

            spacer(root, 10.0);

            root.spawn((
                Text::new("Fall. Collect. Boost back up."),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(subtitle_color()),
            ));

            spacer(root, 52.0);

            menu_button(root, "START", start_bg(), start_border(), start_text(), MenuStartButton);
            spacer(root, 14.0);
            menu_button(root, "QUIT", quit_bg(), quit_border(), quit_text(), MenuQuitButton);

            spacer(root, 52.0);

            root.spawn((
                Text::new("A/D or ←/→ move  ·  Space boost  ·  R restart  ·  Esc menu"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(hint_color()),
            ));
        });
}

fn menu_button(
    parent: &mut ChildSpawnerCommands<'_>,
    label: &str,
    bg: Color,
    border: Color,
    text: Color,
    marker: impl Component,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(bg),
            BorderColor::all(border),
            marker,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(text),
            ));
        });
}

pub(super) fn cleanup_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

/// Handle Start and Quit button presses, tinting the label on hover.
#[allow(clippy::type_complexity)]
pub(super) fn menu_button_system(
    start_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<MenuStartButton>)>,
    quit_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<MenuQuitButton>)>,
    mut btn_text: Query<&mut TextColor>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, children) in start_query.iter() {
        let tint = match interaction {
            Interaction::Pressed => {
                next_state.set(GameState::Playing);
                continue;
            }
            Interaction::Hovered => Color::WHITE,
            Interaction::None => start_text(),
        };
        for child in children.iter() {
            if let Ok(mut color) = btn_text.get_mut(child) {
                *color = TextColor(tint);
            }
        }
    }

    for (interaction, children) in quit_query.iter() {
        let tint = match interaction {
            Interaction::Pressed => {
                exit.write(AppExit::Success);
                continue;
            }
            Interaction::Hovered => Color::WHITE,
            Interaction::None => quit_text(),
        };
        for child in children.iter() {
            if let Ok(mut color) = btn_text.get_mut(child) {
                *color = TextColor(tint);
            }
        }
    }
}

/// **Space** starts a run, **Escape** quits.
pub(super) fn menu_keys_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Space) {
        info!("[menu] Starting run");
        next_state.set(GameState::Playing);
    } else if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
