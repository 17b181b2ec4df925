mod common;

use assert_cmd::Command;
use common::ModuleTree;
use predicates::prelude::*;

const LIVE: &str = "\
usbcore 331776 2 - Live 0x0000000000000000
usb_storage 81920 1 usbcore, Live 0x0000000000000000
";

fn kmodloader(tree: &ModuleTree) -> Command {
    let mut cmd = Command::cargo_bin("kmodloader").unwrap();
    cmd.args(tree.args());
    cmd
}

#[test]
fn modinfo_prints_entries_without_parameters() {
    let tree = ModuleTree::new("");
    let path = tree.add_module(
        "snd-timer.ko",
        b"license=GPL\0parm=timer_limit:Maximum global timers\0depends=snd\0\0\0author=Jaroslav Kysela\0",
    );

    kmodloader(&tree)
        .args(["modinfo", "snd_timer"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_string_lossy().as_ref()))
        .stdout(predicate::str::contains("license:"))
        .stdout(predicate::str::contains("Jaroslav Kysela"))
        .stdout(predicate::str::contains("timer_limit").not());
}

#[test]
fn modinfo_unknown_module_fails() {
    let tree = ModuleTree::new("");

    kmodloader(&tree)
        .args(["modinfo", "no_such_module"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_module"))
        .stderr(predicate::str::contains(
            tree.module_dir().join("no_such_module.ko").to_string_lossy().as_ref(),
        ));
}

#[test]
fn modinfo_rejects_non_elf_file() {
    let tree = ModuleTree::new("");
    std::fs::write(tree.module_dir().join("fake.ko"), b"#!/bin/sh\n").unwrap();

    kmodloader(&tree)
        .args(["modinfo", "fake"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fake.ko"));
}

#[test]
fn lsmod_lists_live_modules_as_csv() {
    let tree = ModuleTree::new(LIVE);

    kmodloader(&tree)
        .args(["--format", "csv", "lsmod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name,size,used,depends"))
        .stdout(predicate::str::contains("usbcore,331776,2,-"))
        .stdout(predicate::str::contains("usb_storage,81920,1,usbcore"));
}

#[test]
fn lsmod_json_with_name_filter() {
    let tree = ModuleTree::new(LIVE);

    let output = kmodloader(&tree)
        .args(["--format", "json", "lsmod", "--name", "storage"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(value["results"][0]["name"], "usb_storage");
}

#[test]
fn insmod_refuses_live_module() {
    let tree = ModuleTree::new(LIVE);
    tree.add_module("usb-storage.ko", b"depends=usbcore\0");

    kmodloader(&tree)
        .args(["insmod", "usb-storage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already loaded"));
}

#[test]
fn rmmod_refuses_module_not_loaded() {
    let tree = ModuleTree::new(LIVE);

    kmodloader(&tree)
        .args(["rmmod", "loop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not loaded"));
}

#[test]
fn depmod_requires_a_module() {
    let tree = ModuleTree::new(LIVE);

    kmodloader(&tree).arg("depmod").assert().failure();
}
