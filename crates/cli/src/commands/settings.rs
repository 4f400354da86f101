//! Target language and credential

use anyhow::Result;
use application::ReviewService;
use console::{style, Term};
use domain::{TargetLanguage, SUPPORTED_LANGUAGES};

pub fn language(service: &ReviewService, name: Option<&str>) -> Result<()> {
    match name {
        None => println!("{}", service.language()),
        Some(name) => {
            let language: TargetLanguage = name.parse()?;
            service.set_language(&language)?;
            println!(
                "{} Target language set to {}",
                style("✓").green(),
                style(language).cyan()
            );
        }
    }
    Ok(())
}

pub fn languages(service: &ReviewService) -> Result<()> {
    let current = service.language();
    for name in SUPPORTED_LANGUAGES {
        if *name == current.as_str() {
            println!("{} {}", style("*").green(), style(name).bold());
        } else {
            println!("  {name}");
        }
    }
    Ok(())
}

pub fn set_key(service: &ReviewService, key: Option<String>) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => {
            let term = Term::stderr();
            term.write_line("Enter your Google Gemini API key (empty to remove):")?;
            term.read_secure_line()?
        }
    };

    service.set_api_key(&key)?;
    if service.has_api_key() {
        println!("{} API key saved", style("✓").green());
    } else {
        println!("{} API key removed", style("✓").green());
    }
    Ok(())
}
