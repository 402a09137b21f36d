pub(super) const ROOT_LONG_ABOUT: &str = "\
Record keep/delete patterns over trees of files

Cleanpick lets you mark files and folders in an example directory as \"keep\" or
\"delete\" and saves that selection as a JSON pattern. The pattern can later be
applied in bulk to many directories with the same layout.

CORE CONCEPTS:

  Toggles:
    A toggle sets a path to checked (delete), unchecked (keep) or inherited.
    Anything you do not toggle takes the state of its nearest toggled parent
    directory, so checking a folder checks everything inside it.

    Toggling a folder discards any earlier toggles made inside it. Order
    matters: toggle the folder first, then the exceptions.

  Pattern files:
    A JSON document mirroring the directory tree. Each directory has a \".\"
    key listing its files with their relative path and state (keep or
    delete), and one key per subdirectory.

  Filtered files:
    Files whose relative path contains \"REST\" are left out of the pattern
    unless the path also contains a \"1\".

TYPICAL WORKFLOW:

  1. Preview what a set of toggles does:
     $ cleanpick state --root example -s build=delete build/keep.txt

  2. Write the pattern:
     $ cleanpick pick example -s build=delete -s build/keep.txt=keep -o pattern

  3. Inspect the result:
     $ cleanpick show pattern.json

GLOBAL OPTIONS:

  -C <DIRECTORY>
    Change to directory before operating (like git -C or make -C).

  -v, --verbose / --log-level <LEVEL>
    Control logging on stderr. Both take precedence over RUST_LOG; without
    them RUST_LOG is honored and the default level is warn.

EXIT CODES:

  0    Success
  1    The pattern file could not be created
  255  Any other error (bad selection file, unreadable directory, ...)
";

pub(super) const PICK_LONG_ABOUT: &str = "\
Walk ROOT and write its keep/delete pattern as JSON

Toggles from --selection are applied first, in file order, followed by each
--set in command line order. Every file under ROOT is then resolved: checked
files are recorded as \"delete\", everything else as \"keep\".

The selection file is TOML:

  [[set]]
  path = \"build\"
  state = \"delete\"

  [[set]]
  path = \"build/keep-me.txt\"
  state = \"keep\"

If ROOT does not exist or is not a directory, an empty pattern is written.
If any directory under ROOT cannot be read, nothing is written.

The pattern is written atomically: either the complete file appears at DEST
(with \".json\" appended if missing) or nothing does.";
