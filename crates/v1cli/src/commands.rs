use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
pub use clap_complete::Shell;

const LONG_ABOUT: &str = r#"v1 is an opinionated CLI for VersionOne.

GETTING STARTED:
    1. Export your instance URL and an access token:
           export V1_URL='https://www7.v1host.com/YourInstance'
           export V1_TOKEN='your-api-token'
    2. Run 'v1 me' to verify the connection and cache your member id
    3. Run 'v1 setup' to map the five workflow stages to your instance's
       story statuses
    4. Bookmark the projects you work in: 'v1 projects add E-1234'

IDENTIFIERS:
    Most commands accept any of:
        E-1234 / S-5678 / TK-90   display numbers
        Epic:1234 / Story:5678    OID tokens
        1, 2, 3                   bookmark indexes (projects) or row numbers
                                  from the last 'v1 features' / 'v1 stories'

EXAMPLES:
    v1 mine                     # stories assigned to me
    v1 stories -p 1             # every story under bookmarked project #1
    v1 status S-5678 review     # move a story to review
    v1 take S-5678              # assign a story to myself
    v1 tree -d tasks            # full project hierarchy
    v1 tui                      # interactive dashboard"#;

#[derive(Parser)]
#[command(name = "v1")]
#[command(author, version)]
#[command(about = "An opinionated CLI for VersionOne")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the effective output format, considering --json shorthand.
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Format for file exports (`--output`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeDepth {
    Deliveries,
    Features,
    Stories,
    Tasks,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show current user info and cache the member OID
    Me,

    /// Interactive setup: discover and map story status OIDs
    #[command(long_about = r#"Interactive setup: discover and map story status OIDs.

Lists the story statuses of your instance and asks which one corresponds
to each of the five workflow stages (backlog, ready, in_progress, review,
done). Enter 0 to leave a stage unmapped. The mapping is stored in
~/.v1cli/config.toml and drives 'v1 status' and the dashboard."#)]
    Setup,

    /// Show available attributes for an asset type
    #[command(long_about = r#"Show available attributes for an asset type.

Common asset types: Epic, Story, Task, Member, StoryStatus

EXAMPLES:
    v1 schema Epic
    v1 schema Epic --filter estimate"#)]
    Schema {
        /// Asset type to inspect
        #[arg(default_value = "Epic")]
        asset_type: String,

        /// Filter attributes by name (case-insensitive)
        #[arg(short = 'F', long)]
        filter: Option<String>,
    },

    /// List and manage project bookmarks
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },

    /// List stories assigned to me
    Mine {
        /// Include completed stories
        #[arg(short, long)]
        all: bool,
    },

    /// List stories under a feature, story, or entire project
    #[command(long_about = r#"List stories under a feature, story, or entire project.

EXAMPLES:
    v1 stories              # All stories under the default project
    v1 stories -p 1         # All stories under bookmarked project #1
    v1 stories 3            # Stories under feature #3 from the last 'v1 features'
    v1 stories E-123        # Stories under feature E-123
    v1 stories S-456        # Sub-stories under story S-456
    v1 stories --json       # Output as JSON"#)]
    Stories {
        /// Parent: row number from 'v1 features', E-nnn, S-nnn, or OID
        parent: Option<String>,

        /// Project: bookmark # (1-99), V1 number (E-nnn), or OID
        #[arg(short, long)]
        project: Option<String>,

        /// Include completed stories
        #[arg(short, long)]
        all: bool,
    },

    /// Show story details, or manage stories
    Story {
        /// Story number (S-nnnn) or OID (Story:nnnn)
        number: Option<String>,

        #[command(subcommand)]
        command: Option<StoryCommand>,
    },

    /// Change story status (backlog/ready/progress/review/done)
    Status {
        /// Story number (S-nnnn) or OID
        number: String,

        /// Target stage; aliases like wip/todo/completed work too
        stage: String,
    },

    /// Assign a story to myself
    Take {
        /// Story number (S-nnnn) or OID
        number: String,
    },

    /// List delivery groups (roadmap) for a project
    Roadmap {
        /// Project: bookmark # (1-99), V1 number (E-nnn), or OID
        #[arg(short, long)]
        project: Option<String>,

        /// Include closed delivery groups
        #[arg(short, long)]
        all: bool,

        /// Write output to a file
        #[arg(short, long)]
        output: Option<String>,

        /// File format used with --output
        #[arg(long, default_value = "table")]
        output_format: ExportFormat,
    },

    /// List features under a delivery group or project
    #[command(long_about = r#"List features under a delivery group or project.

When the parent is a project, features under all of its delivery groups
are included. Rows are cached so 'v1 stories 3' can refer to feature #3
from the latest listing."#)]
    Features {
        /// Parent: bookmark # (1-99), V1 number (E-nnn), or OID
        #[arg(short, long)]
        parent: Option<String>,

        /// Include closed features
        #[arg(short, long)]
        all: bool,
    },

    /// Manage features
    Feature {
        #[command(subcommand)]
        command: FeatureCommand,
    },

    /// List tasks for a story
    #[command(long_about = r#"List tasks for a story.

EXAMPLES:
    v1 tasks 3         # Tasks for story #3 from the last 'v1 stories'
    v1 tasks S-123     # Tasks for story S-123"#)]
    Tasks {
        /// Story: row number from 'v1 stories', S-nnn, or OID
        story: String,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Show the project hierarchy as a tree
    #[command(long_about = r#"Show the project hierarchy as a tree.

Displays the structure: Project -> Delivery Groups -> Features -> Stories
-> Tasks, pruned at the requested depth."#)]
    Tree {
        /// Project: bookmark # (1-99), V1 number (E-nnn), or OID
        #[arg(short, long)]
        project: Option<String>,

        /// Tree depth
        #[arg(short, long, default_value = "stories")]
        depth: TreeDepth,

        /// Include closed items
        #[arg(short, long)]
        all: bool,

        /// Show asset types (Epic, Story, Task)
        #[arg(short, long)]
        types: bool,
    },

    /// Launch the interactive dashboard
    Tui,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List bookmarked projects
    List,

    /// List all projects (from the API)
    All {
        /// Write output to a file
        #[arg(short, long)]
        output: Option<String>,

        /// File format used with --output
        #[arg(long, default_value = "table")]
        output_format: ExportFormat,
    },

    /// Bookmark a project
    #[command(long_about = r#"Bookmark a project.

IDENTIFIER can be a V1 number (E-nnnn), an OID (Epic:nnnn), or a name."#)]
    Add {
        identifier: String,
    },

    /// Remove a project bookmark
    Rm {
        /// Bookmark # (1-99), V1 number (E-nnnn), or OID (Epic:nnnn)
        identifier: String,
    },

    /// Set the default project
    Default {
        /// Bookmark # (1-99), V1 number (E-nnnn), or OID (Epic:nnnn)
        identifier: String,
    },

    /// Configure query settings for a project
    #[command(long_about = r#"Configure query settings for a project.

Auto-detects available fields from your V1 instance so queries never
reference attributes a customized schema lacks.

EXAMPLES:
    v1 projects configure --auto-detect     # Configure the default project
    v1 projects configure 1 --auto-detect   # Configure bookmark #1
    v1 projects configure E-1234 --show     # Show config for E-1234
    v1 projects configure --reset           # Back to defaults"#)]
    Configure {
        /// Bookmark # (1-99), V1 number (E-nnnn), or OID
        identifier: Option<String>,

        /// Auto-detect available fields from the V1 schema
        #[arg(short, long)]
        auto_detect: bool,

        /// Reset to the default configuration
        #[arg(short, long)]
        reset: bool,

        /// Show the current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum StoryCommand {
    /// Create a new story
    Create {
        /// Story name
        name: String,

        /// Project: bookmark # (1-99), V1 number (E-nnn), or OID
        #[arg(short, long)]
        project: Option<String>,

        /// Parent feature number (e.g. E-100)
        #[arg(short = 'e', long)]
        feature: Option<String>,

        /// Story points estimate
        #[arg(short = 's', long)]
        estimate: Option<f64>,

        /// Story description
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FeatureCommand {
    /// Create a new feature
    Create {
        /// Feature name
        name: String,

        /// Parent: bookmark # (1-99), V1 number (E-nnn), or OID
        #[arg(short, long)]
        parent: Option<String>,

        /// Feature description
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Create a task for a story
    Create {
        /// Story number (S-nnnn) or OID
        story: String,

        /// Task name
        name: String,

        /// Hours estimate
        #[arg(short, long)]
        estimate: Option<f64>,
    },

    /// Mark a task as done
    Done {
        /// Task number (TK-nnnn) or OID (Task:nnnn)
        identifier: String,
    },
}
