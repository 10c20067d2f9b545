//! Project discovery: groups `.cs` files into named compilations.
//!
//! Every directory holding a `*.csproj` is one compilation named after the
//! project file. A source file belongs to its nearest enclosing project;
//! files outside any project form a compilation named after the root
//! directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use entity_lint_core::{Compilations, ProgramModel, TypeDecl};

use crate::csharp::CSharpExtractor;
use crate::error::FrontendError;
use crate::extractor::LanguageExtractor;

/// Source files of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSources {
    /// Compilation name.
    pub name: String,
    /// Project directory.
    pub dir: PathBuf,
    /// Source files in path order.
    pub files: Vec<PathBuf>,
}

/// Discovers and compiles C# projects below a root directory.
pub struct ProjectLoader {
    root: PathBuf,
    exclude: Vec<glob::Pattern>,
    respect_gitignore: bool,
    extractor: CSharpExtractor,
}

impl ProjectLoader {
    /// Creates a loader for `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: Vec::new(),
            respect_gitignore: true,
            extractor: CSharpExtractor::new(),
        }
    }

    /// Adds exclude glob patterns, matched against root-relative paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn exclude<I, S>(mut self, patterns: I) -> Result<Self, FrontendError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.exclude.push(glob::Pattern::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Sets whether `.gitignore` files are honoured (default: true).
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude.iter().any(|pattern| {
            if pattern.matches_path(relative) {
                return true;
            }
            // `**/bin/**` also excludes a top-level `bin/`
            let bare = pattern.as_str().replace("**/", "").replace("/**", "");
            !bare.is_empty()
                && !bare.contains(['*', '?', '['])
                && relative.components().any(|c| c.as_os_str() == bare.as_str())
        })
    }

    /// Walks the root and groups source files by project.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk fails.
    pub fn discover(&self) -> Result<Vec<ProjectSources>, FrontendError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false);

        let mut projects: BTreeMap<PathBuf, String> = BTreeMap::new();
        let mut sources = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if self.is_excluded(relative) {
                debug!("Excluding: {}", relative.display());
                continue;
            }
            if path.extension().is_some_and(|e| e == "csproj") {
                let dir = path.parent().unwrap_or(&self.root).to_path_buf();
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                projects.entry(dir).or_insert(name);
            } else if self.extractor.handles(path) {
                sources.push(path.to_path_buf());
            }
        }
        sources.sort();

        let mut grouped: BTreeMap<PathBuf, ProjectSources> = BTreeMap::new();
        for file in sources {
            let owner = projects
                .iter()
                .filter(|(dir, _)| file.starts_with(dir))
                .max_by_key(|(dir, _)| dir.components().count());
            let (dir, name) = match owner {
                Some((dir, name)) => (dir.clone(), name.clone()),
                None => (self.root.clone(), self.root_name()),
            };
            grouped
                .entry(dir.clone())
                .or_insert_with(|| ProjectSources {
                    name,
                    dir,
                    files: Vec::new(),
                })
                .files
                .push(file);
        }

        let mut discovered: Vec<ProjectSources> = grouped.into_values().collect();
        self.disambiguate_names(&mut discovered);
        discovered.sort_by(|a, b| a.name.cmp(&b.name));
        for project in &discovered {
            info!(
                "Discovered compilation {} ({} file(s))",
                project.name,
                project.files.len()
            );
        }
        Ok(discovered)
    }

    /// Appends the relative project directory to names shared by several
    /// directories, so each compilation keeps its own results.
    fn disambiguate_names(&self, projects: &mut [ProjectSources]) {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for project in projects.iter() {
            *counts.entry(project.name.clone()).or_default() += 1;
        }
        for project in projects.iter_mut() {
            if counts[&project.name] < 2 {
                continue;
            }
            let relative = project.dir.strip_prefix(&self.root).unwrap_or(&project.dir);
            let location = if relative.as_os_str().is_empty() {
                ".".to_string()
            } else {
                relative.display().to_string()
            };
            let unique = format!("{} ({location})", project.name);
            warn!(
                "Compilation name {} is used by several directories, reporting {}",
                project.name, unique
            );
            project.name = unique;
        }
    }

    /// Discovers, reads and parses every compilation below the root.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or a source file cannot be read.
    pub fn load(&self) -> Result<Compilations, FrontendError> {
        let mut compilations = Compilations::new();
        for project in self.discover()? {
            let mut declarations: Vec<TypeDecl> = Vec::new();
            for file in &project.files {
                let source = std::fs::read_to_string(file).map_err(|e| FrontendError::Io {
                    path: file.clone(),
                    source: e,
                })?;
                let relative = file.strip_prefix(&self.root).unwrap_or(file);
                declarations.extend(self.extractor.extract(&source, relative)?);
            }
            let model = ProgramModel::from_declarations(project.name.clone(), declarations);
            compilations.insert(project.name, model);
        }
        Ok(compilations)
    }

    fn root_name(&self) -> String {
        self.root
            .canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(&self.root)
            .file_name()
            .map_or_else(|| "root".to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// Compiles in-memory `(file name, source)` pairs into one program model.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded or parsing aborts.
pub fn compile_sources(
    name: &str,
    sources: &[(&str, &str)],
) -> Result<ProgramModel, FrontendError> {
    let extractor = CSharpExtractor::new();
    let mut declarations = Vec::new();
    for (file, source) in sources {
        declarations.extend(extractor.extract(source, Path::new(file))?);
    }
    Ok(ProgramModel::from_declarations(name, declarations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, content).expect("write");
    }

    #[test]
    fn groups_files_by_nearest_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "src/Sales/Sales.csproj", "<Project />");
        write(root, "src/Sales/Order.cs", "public sealed class Order { }");
        write(root, "src/Sales/Lines/OrderLine.cs", "public sealed class OrderLine { }");
        write(root, "src/Crm/Crm.csproj", "<Project />");
        write(root, "src/Crm/Customer.cs", "public sealed class Customer { }");
        write(root, "scripts/Tool.cs", "public static class Tool { }");

        let projects = ProjectLoader::new(root).discover().expect("discover");
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        let root_name = root
            .canonicalize()
            .expect("canonical")
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .expect("name");
        let mut expected = vec!["Crm".to_string(), "Sales".to_string(), root_name];
        expected.sort();
        assert_eq!(names, expected);

        let sales = projects.iter().find(|p| p.name == "Sales").expect("sales");
        assert_eq!(sales.files.len(), 2);
    }

    #[test]
    fn same_named_projects_stay_separate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "sales/Domain/Domain.csproj", "<Project />");
        write(root, "sales/Domain/Order.cs", "public sealed class Order { }");
        write(root, "billing/Domain/Domain.csproj", "<Project />");
        write(root, "billing/Domain/Order.cs", "public class Order { }");

        let compilations = ProjectLoader::new(root).load().expect("load");
        let billing = format!("Domain ({})", Path::new("billing").join("Domain").display());
        let sales = format!("Domain ({})", Path::new("sales").join("Domain").display());
        let names: Vec<&str> = compilations.keys().map(String::as_str).collect();
        assert_eq!(names, vec![billing.as_str(), sales.as_str()]);
        assert_eq!(compilations[&billing].types.len(), 1);
        assert_eq!(compilations[&sales].types.len(), 1);
        assert!(compilations[&sales].types[0].is_sealed());
    }

    #[test]
    fn project_named_like_root_is_not_merged_with_loose_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        let root_name = root
            .canonicalize()
            .expect("canonical")
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .expect("name");
        write(root, &format!("app/{root_name}.csproj"), "<Project />");
        write(root, "app/Order.cs", "public sealed class Order { }");
        write(root, "Loose.cs", "public class Loose { }");

        let projects = ProjectLoader::new(root).discover().expect("discover");
        assert_eq!(projects.len(), 2);
        assert!(projects.iter().all(|p| p.files.len() == 1));
        assert!(projects.iter().any(|p| p.name == format!("{root_name} (.)")));
    }

    #[test]
    fn excludes_build_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "App/App.csproj", "<Project />");
        write(root, "App/Order.cs", "public sealed class Order { }");
        write(root, "App/obj/Debug/Generated.cs", "public class Generated { }");
        write(root, "App/bin/Release/Copy.cs", "public class Copy { }");

        let compilations = ProjectLoader::new(root)
            .exclude(["**/bin/**", "**/obj/**"])
            .expect("patterns")
            .load()
            .expect("load");
        let app = &compilations["App"];
        let names: Vec<&str> = app.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Order"]);
        assert_eq!(
            app.types[0].location.file,
            PathBuf::from("App").join("Order.cs")
        );
    }

    #[test]
    fn partial_classes_merge_across_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "Domain/Domain.csproj", "<Project />");
        write(
            root,
            "Domain/Customer.cs",
            "namespace D; public sealed partial class Customer { public string Name { get; } }",
        );
        write(
            root,
            "Domain/Customer.Rules.cs",
            "namespace D; public partial class Customer { private bool IsValid() => true; }",
        );

        let compilations = ProjectLoader::new(root).load().expect("load");
        let domain = &compilations["Domain"];
        assert_eq!(domain.types.len(), 1);
        let customer = &domain.types[0];
        assert!(customer.is_sealed());
        assert_eq!(customer.properties.len(), 1);
        assert_eq!(customer.methods.len(), 1);
    }

    #[test]
    fn compile_sources_merges_in_memory_files() {
        let model = compile_sources(
            "Sales",
            &[
                ("A.cs", "public partial class Order { public void A() { } }"),
                ("B.cs", "public partial class Order { public void B() { } }"),
            ],
        )
        .expect("compile");
        assert_eq!(model.name, "Sales");
        assert_eq!(model.types.len(), 1);
        assert_eq!(model.types[0].methods.len(), 2);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let result = ProjectLoader::new(".").exclude(["[unclosed"]);
        assert!(matches!(result, Err(FrontendError::Pattern(_))));
    }
}
