//! Headless mode for the persona studio.
//!
//! This module provides a simple text-based interface for training personas
//! without a TUI. It's designed for automated testing and AI agents.

use faces_core::{
    BrainType, CharacterProfile, ChatMode, ChatSession, PersonaBuilder, ProfileStore, VesselMind,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Run the studio in headless mode.
///
/// This provides a simple line-oriented protocol:
/// - Lines starting with `#` are commands (create, open, mode, quit, ...)
/// - All other lines are chat input for the open session, routed by mode
pub async fn run_headless(data_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store = ProfileStore::new(data_dir);
    let mind = VesselMind::from_env()?;
    let mut personas = store.load_personas().await?;
    let mut session: Option<ChatSession> = None;

    println!("=== FacesOfAI Headless Mode ===");
    println!("Vessels: {}", personas.len());
    println!();
    print_help();
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Handle commands
        if let Some(rest) = line.strip_prefix('#') {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            match parts.first().copied() {
                Some("quit") | Some("exit") => {
                    close_session(&mut session, &mut personas);
                    store.save_personas(&personas).await?;
                    println!("Goodbye!");
                    break;
                }
                Some("help") => print_help(),
                Some("list") => {
                    if personas.is_empty() {
                        println!("[EMPTY] No vessels deployed.");
                    }
                    for (i, p) in personas.iter().enumerate() {
                        println!(
                            "[{}] {} - {} ({} truths, {})",
                            i,
                            p.name,
                            p.role,
                            p.fact_count(),
                            p.brain_type.label()
                        );
                    }
                }
                Some("create") => {
                    let draft = rest.trim_start_matches("create").trim();
                    match create_persona(draft) {
                        Ok(persona) => {
                            println!("[CREATED] {} ({})", persona.name, persona.id);
                            personas.insert(0, persona);
                            store.save_personas(&personas).await?;
                        }
                        Err(e) => println!("[ERROR] {e}"),
                    }
                }
                Some("open") => {
                    let index = parts.get(1).and_then(|s| s.parse::<usize>().ok());
                    // Clone the target up front: closing the old session
                    // writes back into the roster.
                    match index.and_then(|i| personas.get(i).cloned()) {
                        Some(persona) => {
                            close_session(&mut session, &mut personas);
                            let opened = ChatSession::open(persona);
                            if let Some(greeting) = opened.transcript().first() {
                                println!("[VESSEL] {}", greeting.content);
                            }
                            session = Some(opened);
                        }
                        None => println!("[ERROR] Usage: #open <index>"),
                    }
                }
                Some("close") => {
                    close_session(&mut session, &mut personas);
                    store.save_personas(&personas).await?;
                    println!("[CLOSED] Session ended.");
                }
                Some("mode") => match (session.as_mut(), parts.get(1).copied()) {
                    (Some(s), Some("teach")) => {
                        s.set_mode(ChatMode::Teach);
                        println!("[MODE] TEACH");
                    }
                    (Some(s), Some("probe")) => {
                        s.set_mode(ChatMode::Probe);
                        println!("[MODE] PROBE");
                    }
                    (None, _) => println!("[ERROR] No open session."),
                    _ => println!("[ERROR] Usage: #mode teach|probe"),
                },
                Some("deploy") => match session.as_mut() {
                    Some(s) => {
                        s.ensure_snippet(&mind).await;
                        if let Some(snippet) = s.snippet() {
                            println!("[SNIPPET]");
                            println!("{snippet}");
                        }
                    }
                    None => println!("[ERROR] No open session."),
                },
                Some("status") => match session.as_ref() {
                    Some(s) => {
                        let p = s.persona();
                        println!("[STATUS]");
                        println!("  Vessel: {} ({})", p.name, p.role);
                        println!("  Mode: {}", s.mode().label());
                        println!("  Truths: {}", p.fact_count());
                        println!("  Brain: {}", p.brain_type.label());
                    }
                    None => println!("[STATUS] No open session. Vessels: {}", personas.len()),
                },
                _ => println!("[ERROR] Unknown command. Type #help for help."),
            }
            stdout.flush().ok();
            continue;
        }

        // Route chat input through the open session
        let Some(active) = session.as_mut() else {
            println!("[ERROR] Open a session first with #open <index>.");
            continue;
        };

        match active.mode() {
            ChatMode::Teach => {
                active.teach(line);
            }
            ChatMode::Probe => {
                print!("[SYNCING]");
                stdout.flush().ok();
                active.probe(&mind, line).await;
                print!("\r         \r");
                stdout.flush().ok();
            }
        }

        if let Some(reply) = active.transcript().last() {
            println!("[VESSEL] {}", reply.content);
        }
        println!();
    }

    Ok(())
}

/// Fold the open session's persona back into the roster.
fn close_session(
    session: &mut Option<ChatSession>,
    personas: &mut [faces_core::Persona],
) {
    if let Some(closed) = session.take() {
        let persona = closed.into_persona();
        if let Some(slot) = personas.iter_mut().find(|p| p.id == persona.id) {
            *slot = persona;
        }
    }
}

/// Parse a `name | role [| character [| brain]]` line into a persona.
fn create_persona(draft: &str) -> Result<faces_core::Persona, String> {
    let fields: Vec<&str> = draft.split('|').map(str::trim).collect();
    let name = fields.first().copied().unwrap_or_default();
    let role = fields.get(1).copied().unwrap_or_default();

    let mut builder = PersonaBuilder::new().name(name).role(role);

    if let Some(character) = fields.get(2) {
        let profile = CharacterProfile::all()
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(character))
            .copied()
            .ok_or_else(|| format!("Unknown character: {character}"))?;
        builder = builder.character(profile);
    }

    if let Some(brain) = fields.get(3) {
        let brain_type = match brain.to_lowercase().as_str() {
            "standard" => BrainType::Standard,
            "high" | "high-performance" | "pro" => BrainType::HighPerformance,
            other => return Err(format!("Unknown brain tier: {other}")),
        };
        builder = builder.brain_type(brain_type);
    }

    builder.build().map_err(|e| e.to_string())
}

fn print_help() {
    println!("Commands:");
    println!("  #quit                 - Save and exit");
    println!("  #list                 - List deployed vessels");
    println!("  #create <name>|<role>[|<character>[|<brain>]]");
    println!("  #open <index>         - Open a training session");
    println!("  #close                - Close the session");
    println!("  #mode teach|probe     - Switch chat mode");
    println!("  #deploy               - Generate the embed snippet");
    println!("  #status               - Show session status");
    println!("  #help                 - Show this help");
    println!("  (anything else is chat input for the open session)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_line_parsing() {
        let persona = create_persona("ORACLE | Support Agent | Witty | pro").unwrap();
        assert_eq!(persona.name, "ORACLE");
        assert_eq!(persona.role, "Support Agent");
        assert_eq!(persona.character, CharacterProfile::Witty);
        assert_eq!(persona.brain_type, BrainType::HighPerformance);
    }

    #[test]
    fn test_create_line_defaults() {
        let persona = create_persona("ORACLE | Support Agent").unwrap();
        assert_eq!(persona.character, CharacterProfile::Professional);
        assert_eq!(persona.brain_type, BrainType::Standard);
    }

    #[test]
    fn test_create_line_requires_role() {
        assert!(create_persona("ORACLE").is_err());
        assert!(create_persona("").is_err());
    }

    #[test]
    fn test_create_line_rejects_unknown_character() {
        assert!(create_persona("A | B | Grumpy").is_err());
    }

    #[test]
    fn test_switching_vessels_folds_prior_session() {
        let mut personas = vec![
            create_persona("ALPHA | First").unwrap(),
            create_persona("BETA | Second").unwrap(),
        ];

        let mut session = Some(ChatSession::open(personas[0].clone()));
        session.as_mut().unwrap().teach("A permanent truth.");

        // Same sequence as the #open command: resolve the target before
        // the old session writes back into the roster.
        let next = personas.get(1).cloned();
        close_session(&mut session, &mut personas);
        session = next.map(ChatSession::open);

        assert_eq!(personas[0].fact_count(), 1);
        assert_eq!(session.unwrap().persona().name, "BETA");
    }
}
