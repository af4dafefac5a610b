use toolbox_core::{ContextConfig, Resolution, plugin::PluginMetadata};

/// Dry-run / verbose view of a resolved command
pub fn render_resolution(resolution: &Resolution) -> String {
    let mut lines = vec![
        format!("Context: {}", resolution.detection),
        format!("Base command: {}", resolution.base_command()),
    ];
    if !resolution.args().is_empty() {
        lines.push(format!("Additional arguments: {:?}", resolution.args()));
    }
    lines.join("\n")
}

/// One line per command: name, then its description or invocation string
pub fn render_commands(context: &ContextConfig) -> String {
    let width = context.commands.keys().map(String::len).max().unwrap_or(0);

    context
        .commands
        .iter()
        .map(|(name, invocation)| {
            let detail = context.description(name).unwrap_or(invocation);
            format!("{name:<width$}  {detail}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_plugin_table(plugins: &[&PluginMetadata]) -> String {
    let name_width = plugins
        .iter()
        .map(|p| p.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);
    let version_width = plugins
        .iter()
        .map(|p| p.version.len())
        .chain(std::iter::once("VERSION".len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "{:<name_width$}  {:<version_width$}  CONTEXTS",
        "NAME", "VERSION"
    )];
    for plugin in plugins {
        lines.push(format!(
            "{:<name_width$}  {:<version_width$}  {}",
            plugin.name,
            plugin.version,
            plugin.contexts.join(", ")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbox_core::{Detection, Invocation};

    fn resolution(detection: Detection, base: &str, args: &[&str]) -> Resolution {
        Resolution {
            detection,
            command: "build".to_string(),
            invocation: Invocation::new(base, args.iter().map(|s| s.to_string()).collect()),
            suspicious_args: vec![],
        }
    }

    #[test]
    fn test_render_resolution_without_args() {
        let rendered = render_resolution(&resolution(
            Detection::builtin("go"),
            "go build ./...",
            &[],
        ));
        insta::assert_snapshot!(rendered, @r"
        Context: go (detected)
        Base command: go build ./...
        ");
    }

    #[test]
    fn test_render_resolution_with_args() {
        let rendered = render_resolution(&resolution(
            Detection::plugin("docker", "docker"),
            "docker build .",
            &["--no-cache", "-t", "my app"],
        ));
        insta::assert_snapshot!(rendered, @r#"
        Context: docker (detected via plugin: docker)
        Base command: docker build .
        Additional arguments: ["--no-cache", "-t", "my app"]
        "#);
    }

    #[test]
    fn test_render_commands_prefers_descriptions() {
        let context = ContextConfig::new()
            .with_command("build", "go build ./...")
            .with_command("test", "go test ./...")
            .with_description("test", "Run every package's tests");

        insta::assert_snapshot!(render_commands(&context), @r"
        build  go build ./...
        test   Run every package's tests
        ");
    }

    #[test]
    fn test_render_plugin_table() {
        let docker = PluginMetadata {
            name: "docker".to_string(),
            version: "1.0.0".to_string(),
            enabled: true,
            context_count: 2,
            contexts: vec!["docker".to_string(), "docker-compose".to_string()],
        };
        let ubuntu = PluginMetadata {
            name: "ubuntu".to_string(),
            version: "1.0.0".to_string(),
            enabled: true,
            context_count: 1,
            contexts: vec!["ubuntu-packaging".to_string()],
        };

        insta::assert_snapshot!(render_plugin_table(&[&docker, &ubuntu]), @r"
        NAME    VERSION  CONTEXTS
        docker  1.0.0    docker, docker-compose
        ubuntu  1.0.0    ubuntu-packaging
        ");
    }
}
