#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{TempDir, tempdir};

pub const FULL_HEADER: &str = "Utilization Type,State,NDC,Labeler Code,Product Code,Package Size,Year,Quarter,Product Name,Units Reimbursed,Number of Prescriptions,Total Amount Reimbursed,Medicaid Amount Reimbursed,Non Medicaid Amount Reimbursed";

/// Five rows of a state utilization extract, with gaps in the amount columns.
pub const FULL_ROWS: &[&str] = &[
    "FFSU,CA,00002143380,00002,1433,80,2024,1,TRULICITY,120,4,1500.50,1200.25,300.25",
    "FFSU,CA,00002143480,00002,1434,80,2024,1,TRULICITY,60,2,800,600,200",
    "MCOU,CA,00003089421,00003,0894,21,2024,2,ELIQUIS,300,10,2500,,400",
    "MCOU,CA,00006027731,00006,0277,31,2024,2,JANUVIA,90,3,NaN,700,100",
    "FFSU,CA,00169413712,00169,4137,12,2024,3,OZEMPIC,45,1,3000,2800,200",
];

/// Same data without the Medicaid split.
pub const PARTIAL_HEADER: &str =
    "Utilization Type,State,Product Name,Units Reimbursed,Total Amount Reimbursed";

pub const PARTIAL_ROWS: &[&str] = &[
    "FFSU,CA,A,10,100",
    "FFSU,CA,B,5,300",
    "MCOU,CA,A,20,50",
];

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes a CSV made of `header` and `rows`, one per line.
    pub fn write_csv(&self, name: &str, header: &str, rows: &[&str]) -> PathBuf {
        let mut contents = String::from(header);
        contents.push('\n');
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        self.write(name, &contents)
    }

    pub fn full_dataset(&self) -> PathBuf {
        self.write_csv("drug_utilization_data.csv", FULL_HEADER, FULL_ROWS)
    }

    pub fn partial_dataset(&self) -> PathBuf {
        self.write_csv("partial.csv", PARTIAL_HEADER, PARTIAL_ROWS)
    }
}

/// The compiled binary with logging silenced so stderr only carries errors.
pub fn drug_eda() -> Command {
    let mut cmd = Command::cargo_bin("drug-eda").expect("binary exists");
    cmd.env("RUST_LOG", "off");
    cmd
}
