//! Harness configuration
//!
//! Defaults reproduce the file layout of the RISC-V pipeline testbench this harness was written for.

use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATE: &str = "riscv_pipelined.sv";
pub const DEFAULT_BACKUP: &str = "riscv_pipelined_backup.sv";
pub const DEFAULT_TEST_LIST: &str = "tests.txt";
pub const DEFAULT_LOG: &str = "sim_output.txt";
pub const DEFAULT_PLACEHOLDER: &str = "template.memfile";

const DEFAULT_SIMULATOR: &str = "vsim";
const DEFAULT_DO_SCRIPT: &str = "riscv_pipelined.do";

/// External simulator invocation: program plus its fixed argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SimulatorCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `vsim -do riscv_pipelined.do -c`: run the do-script in command-line (batch) mode.
    pub fn vsim() -> Self {
        Self::new(DEFAULT_SIMULATOR, ["-do", DEFAULT_DO_SCRIPT, "-c"])
    }
}

impl Default for SimulatorCommand {
    fn default() -> Self {
        Self::vsim()
    }
}

/// Batch harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory relative paths are resolved against; also the simulator's working directory
    pub work_dir: Option<PathBuf>,
    /// Shared template source rewritten before every test
    pub template: PathBuf,
    /// Where the pristine template is parked for the duration of the batch
    pub backup: PathBuf,
    /// One test identifier per line
    pub test_list: PathBuf,
    /// Raw simulator output, one section per test
    pub log: PathBuf,
    /// Literal token in the template replaced by each test identifier
    pub placeholder: String,
    pub simulator: SimulatorCommand,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            work_dir: None,
            template: PathBuf::from(DEFAULT_TEMPLATE),
            backup: PathBuf::from(DEFAULT_BACKUP),
            test_list: PathBuf::from(DEFAULT_TEST_LIST),
            log: PathBuf::from(DEFAULT_LOG),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            simulator: SimulatorCommand::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = path.into();
        self
    }

    pub fn with_backup(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup = path.into();
        self
    }

    pub fn with_test_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_list = path.into();
        self
    }

    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = path.into();
        self
    }

    pub fn with_placeholder(mut self, token: impl Into<String>) -> Self {
        self.placeholder = token.into();
        self
    }

    pub fn with_simulator(mut self, simulator: SimulatorCommand) -> Self {
        self.simulator = simulator;
        self
    }

    /// Resolve `path` against the working directory (absolute paths pass through).
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.work_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.template)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.resolve(&self.backup)
    }

    pub fn test_list_path(&self) -> PathBuf {
        self.resolve(&self.test_list)
    }

    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log)
    }
}
