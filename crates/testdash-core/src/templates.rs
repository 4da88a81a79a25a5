//! Starter documents written by [`crate::project::scaffold`].

/// Placeholder in [`ACTIVE_TASKS`] replaced with the scaffold date.
pub const DATE_PLACEHOLDER: &str = "[DATE]";

pub const CLAUDE_MD: &str = "# CLAUDE.md

Guidance for AI-assisted work in this repository.

## Development Process

This project uses the Claude task management system. See `claude_tasks/`:
- `QUICK_REFERENCE.md`: session checklist and TDD workflow
- `PRINCIPLES_QUICK_CARD.md`: core principles
- `active/ACTIVE_TASKS.md`: current tasks

Completed tasks move to `claude_tasks/finished/`.

## Repository Overview

Describe the project here.

## Tests

Browse and run discovered tests with `testdash serve`, then open http://localhost:8085.
Refresh the test registry with `testdash discover`.

Follow TDD: RED, GREEN, REFACTOR.
";

/// Prepended to an existing CLAUDE.md that does not mention the task system yet.
pub const CLAUDE_MD_REFERENCE: &str = "# CLAUDE.md

## Claude Development Process
This project uses the Claude task management system for AI-assisted development.

### Key Documents
- `claude_tasks/QUICK_REFERENCE.md`: quick commands and workflow
- `claude_tasks/PRINCIPLES_QUICK_CARD.md`: core development principles
- `claude_tasks/active/ACTIVE_TASKS.md`: current task tracking

---

";

pub const QUICK_REFERENCE: &str = "# Task Management Quick Reference

## Session Start
```bash
git status
cat claude_tasks/active/ACTIVE_TASKS.md
testdash discover
```

## Start a Task
1. **Check** the current state and active tasks
2. **Plan**: mark the task \"In Progress\" in ACTIVE_TASKS.md
3. **Red**: write failing tests first
4. **Green**: write the minimal code that passes
5. **Refactor**: improve the code with tests green

## Complete a Task
1. **Document** it in a file under finished/
2. **Commit** with a descriptive message
3. **Archive** the entry out of ACTIVE_TASKS.md
";

pub const PRINCIPLES_QUICK_CARD: &str = "# Development Principles Quick Card

1. **Test driven**: no code without tests
2. **Fail fast**: fix root causes, not symptoms
3. **Modular**: one responsibility per unit
4. **Reuse before build**: check existing code first
5. **Open source first**: prefer proven libraries
6. **No legacy baggage**: leave no tech debt behind
7. **Excellence**: best of breed only

## Workflow
RED -> GREEN -> REFACTOR

## Quality Bar
- Over 80% test coverage
- Clear names
- Documented decisions
- No commented-out code
";

pub const ACTIVE_TASKS: &str = "# Active Tasks

## Current Sprint
*Last Updated: [DATE]*

---

## Task Queue

### Task 1: [Example Task]
- **ID**: 1
- **Priority**: High/Medium/Low
- **Status**: Not Started
- **Dependencies**: None
- **Description**: What needs to be done
- **Acceptance Criteria**:
  - [ ] Criterion 1
  - [ ] Tests pass

---

## Completed Tasks
*Move to finished/ when complete*
";
