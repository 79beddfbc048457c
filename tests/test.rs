use assert_cmd::Command;
use indoc::indoc;

const BIN_NAME: &str = "tetris-engine";
/// Five O pieces side by side fill the bottom two rows.
const TWO_LINES: &str = "start,left*4,drop,left*2,drop,drop,right*2,drop,right*4,drop";

fn tetris() -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin(BIN_NAME)?;
    cmd.args(["--pieces", "O"]);
    Ok(cmd)
}

#[test]
fn not_started() -> anyhow::Result<()> {
    tetris()?
        .write_stdin("tick*5,drop")
        .assert()
        .success()
        .stdout("score=0 level=1 state=not-started\n");
    Ok(())
}

#[test]
fn hard_drop_to_the_floor() -> anyhow::Result<()> {
    tetris()?
        .arg("--board")
        .write_stdin("start,drop")
        .assert()
        .success()
        .stdout(indoc! {"
            ....OO....
            ....OO....
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ....OO....
            ....OO....
            score=0 level=1 state=running
        "});
    Ok(())
}

#[test]
fn two_lines() -> anyhow::Result<()> {
    tetris()?
        .write_stdin(TWO_LINES)
        .assert()
        .success()
        .stdout("score=200 level=1 state=running\n");
    Ok(())
}

#[test]
fn level_up() -> anyhow::Result<()> {
    let rest = TWO_LINES.trim_start_matches("start,");
    tetris()?
        .arg("--verbose")
        .write_stdin(format!("{TWO_LINES},{rest},{rest}"))
        .assert()
        .success()
        .stdout(indoc! {"
            start enabled: true
            start enabled: false
            score: 200
            score: 400
            score: 600
            level: 2
            score=600 level=2 state=running
        "});
    Ok(())
}

const FALLEN_TWO_ROWS: &str = "..........\n..........\n....OO....\n....OO....\n";

#[test]
fn waiting_lets_the_piece_fall() -> anyhow::Result<()> {
    let output = tetris()?
        .arg("--board")
        .write_stdin("start,wait*2500")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8(output)?.starts_with(FALLEN_TWO_ROWS));
    Ok(())
}

#[test]
fn faster_interval() -> anyhow::Result<()> {
    let output = tetris()?
        .args(["--board", "--interval-ms", "100"])
        .write_stdin("start,wait*250")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8(output)?.starts_with(FALLEN_TWO_ROWS));
    Ok(())
}

#[test]
fn game_over() -> anyhow::Result<()> {
    tetris()?
        .arg("--verbose")
        .write_stdin("start,drop*10,left,drop,tick")
        .assert()
        .success()
        .stdout(indoc! {"
            start enabled: true
            start enabled: false
            game over! score: 0
            start enabled: true
            score=0 level=1 state=game-over
        "});
    Ok(())
}

#[test]
fn retry_after_game_over() -> anyhow::Result<()> {
    tetris()?
        .write_stdin("start,drop*10,start,drop")
        .assert()
        .success()
        .stdout("score=0 level=1 state=running\n");
    Ok(())
}

#[test]
fn abort() -> anyhow::Result<()> {
    tetris()?
        .write_stdin("start,abort,drop")
        .assert()
        .success()
        .stdout("score=0 level=1 state=game-over\n");
    Ok(())
}

#[test]
fn every_line_is_a_new_game() -> anyhow::Result<()> {
    tetris()?
        .write_stdin(format!("{TWO_LINES}\nstart\n\n"))
        .assert()
        .success()
        .stdout(indoc! {"
            score=200 level=1 state=running
            score=0 level=1 state=running
            score=0 level=1 state=not-started
        "});
    Ok(())
}

#[test]
fn seeded_random_games_are_repeatable() -> anyhow::Result<()> {
    let script = "start,drop*30,rotate,left*3,drop*5";
    let run = || -> anyhow::Result<Vec<u8>> {
        Ok(Command::cargo_bin(BIN_NAME)?
            .args(["--seed", "42", "--board"])
            .write_stdin(script)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone())
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn bad_step_fails() -> anyhow::Result<()> {
    tetris()?.write_stdin("start,hold").assert().failure();
    Ok(())
}

#[test]
fn bad_pieces_fail() -> anyhow::Result<()> {
    Command::cargo_bin(BIN_NAME)?
        .args(["--pieces", "OQ"])
        .write_stdin("start")
        .assert()
        .failure();
    Ok(())
}
