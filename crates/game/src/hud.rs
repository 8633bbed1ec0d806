//! HUD text: status line, look-at label and the suspect dossier.
//! The window title carries the status line until a text overlay exists.

use engine_core::{EntityKind, EntityTag};

use crate::clue::Clue;
use crate::level::Level;
use crate::npc::Npc;
use crate::state::{GamePhase, Session};

/// Crosshair label for whatever the player is looking at.
pub fn look_label(level: &Level, tag: EntityTag) -> Option<String> {
    let name = level.describe(tag)?;
    Some(match tag.kind {
        EntityKind::Npc => format!("SUSPECT: {}", name.to_uppercase()),
        EntityKind::Clue => format!("EVIDENCE: {}", name.to_uppercase()),
    })
}

/// One-line summary of the session, used as the window title.
pub fn hud_line(session: &Session) -> String {
    match session.phase {
        GamePhase::MainMenu => "TRAITOR | CLICK OR PRESS ENTER TO BEGIN".to_string(),
        GamePhase::Loading => format!("TRAITOR | CASE {} | {}", session.case_number, session.status),
        GamePhase::Won => format!(
            "TRAITOR | CASE {} SOLVED | PRESS ENTER FOR THE NEXT CASE",
            session.case_number
        ),
        GamePhase::Failed => format!(
            "TRAITOR | WRONG SUSPECT | PRESS ENTER TO RETRY CASE {}",
            session.case_number
        ),
        GamePhase::Playing => {
            let mut line = format!("TRAITOR | CASE {} | {}", session.case_number, session.status);
            if session.pistol_equipped {
                line.push_str(" | PISTOL DRAWN");
            }
            let looking = session
                .level
                .as_ref()
                .zip(session.looking_at)
                .and_then(|(level, tag)| look_label(level, tag));
            if let Some(label) = looking {
                line.push_str(" | ");
                line.push_str(&label);
            }
            if let Some(message) = session.messages.latest() {
                line.push_str(" | ");
                line.push_str(message);
            }
            line
        }
    }
}

/// Dossier page: every suspect with their traits, sorted by name.
pub fn dossier_lines(level: &Level) -> Vec<String> {
    let mut suspects: Vec<(String, String)> = level
        .world
        .query::<&Npc>()
        .iter()
        .map(|(_, npc)| (npc.name.clone(), format!("{} [{}]: {}", npc.name, npc.color.name, npc.traits.join(", "))))
        .collect();
    suspects.sort();
    suspects.into_iter().map(|(_, line)| line).collect()
}

/// Collected evidence with its text, by category.
pub fn evidence_lines(level: &Level) -> Vec<String> {
    let mut lines: Vec<String> = level
        .world
        .query::<&Clue>()
        .iter()
        .filter(|(_, clue)| clue.is_found())
        .map(|(_, clue)| format!("{}: {}", clue.category, clue.description))
        .collect();
    lines.sort();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::CaseBlueprint;
    use rand::{rngs::StdRng, SeedableRng};

    fn level() -> Level {
        Level::spawn(&CaseBlueprint::generate(1, 5), &[], &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn dossier_lists_every_suspect_once() {
        let level = level();
        let lines = dossier_lines(&level);
        assert_eq!(lines.len(), 5);
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
        assert!(lines.iter().all(|l| l.contains(':')));
    }

    #[test]
    fn look_labels_name_the_target() {
        let level = level();
        let culprit = level.culprit().unwrap();
        let label = look_label(&level, EntityTag::npc(culprit)).unwrap();
        assert!(label.starts_with("SUSPECT: "));

        let clue = level.world.query::<&Clue>().iter().map(|(e, _)| e).next().unwrap();
        let label = look_label(&level, EntityTag::clue(clue)).unwrap();
        assert!(label.starts_with("EVIDENCE: "));
    }

    #[test]
    fn evidence_lists_only_found_clues() {
        let mut level = level();
        assert!(evidence_lines(&level).is_empty());

        let (clue, position) = {
            let mut query = level.world.query::<(&Clue, &engine_core::Position)>();
            let (entity, (_, position)) = query.iter().next().unwrap();
            (entity, position.0)
        };
        let mut pose = engine_core::Pose::from_position(position + engine_core::Vec3::new(0.0, 1.0, 0.0));
        pose.pitch = -std::f32::consts::FRAC_PI_2;
        assert_eq!(
            crate::interaction::grab(&mut level, &pose),
            crate::interaction::GrabOutcome::Collected(clue)
        );

        let lines = evidence_lines(&level);
        assert_eq!(lines.len(), 1);
        let category = level.world.get::<&Clue>(clue).unwrap().category;
        assert!(lines[0].starts_with(category));
    }
}
