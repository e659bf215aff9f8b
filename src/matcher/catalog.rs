// The static distro/tag catalog the matcher scores against.
// Hand curated, release dates refreshed whenever someone
// remembers to.

use super::DistroTags;
use super::Experience::{Advanced, Beginner, Intermediate};
use super::Hardware::{HighEnd, LowEnd, Modern};
use super::UseCase::{
  Desktop, Development, Education, Gaming, Multimedia, Privacy, Server
};

pub static CATALOG: &[DistroTags] = &[
  DistroTags {
    name: "Ubuntu",
    last_release: "2025-04-17",
    experience: &[Beginner, Intermediate],
    use_cases: &[Desktop, Development, Server],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Linux Mint",
    last_release: "2025-01-15",
    experience: &[Beginner],
    use_cases: &[Desktop, Multimedia, Education],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "Debian",
    last_release: "2025-05-17",
    experience: &[Intermediate, Advanced],
    use_cases: &[Desktop, Server, Development],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "Fedora",
    last_release: "2025-04-29",
    experience: &[Intermediate],
    use_cases: &[Desktop, Development],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Arch Linux",
    last_release: "2025-06-01",
    experience: &[Advanced],
    use_cases: &[Desktop, Development, Gaming],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Manjaro",
    last_release: "2025-03-10",
    experience: &[Beginner, Intermediate],
    use_cases: &[Desktop, Gaming, Multimedia],
    hardware: &[Modern]
  },
  DistroTags {
    name: "openSUSE Leap",
    last_release: "2025-06-04",
    experience: &[Intermediate],
    use_cases: &[Desktop, Server, Development],
    hardware: &[Modern]
  },
  DistroTags {
    name: "openSUSE Tumbleweed",
    last_release: "2025-06-20",
    experience: &[Intermediate, Advanced],
    use_cases: &[Desktop, Development],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Pop!_OS",
    last_release: "2024-12-12",
    experience: &[Beginner, Intermediate],
    use_cases: &[Desktop, Gaming, Development],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "elementary OS",
    last_release: "2024-08-01",
    experience: &[Beginner],
    use_cases: &[Desktop, Multimedia],
    hardware: &[Modern]
  },
  DistroTags {
    name: "Zorin OS",
    last_release: "2025-02-20",
    experience: &[Beginner],
    use_cases: &[Desktop, Education],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "MX Linux",
    last_release: "2025-01-12",
    experience: &[Beginner, Intermediate],
    use_cases: &[Desktop, Multimedia],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "EndeavourOS",
    last_release: "2025-04-19",
    experience: &[Intermediate, Advanced],
    use_cases: &[Desktop, Gaming, Development],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Kubuntu",
    last_release: "2025-04-17",
    experience: &[Beginner, Intermediate],
    use_cases: &[Desktop, Multimedia],
    hardware: &[Modern]
  },
  DistroTags {
    name: "Xubuntu",
    last_release: "2025-04-17",
    experience: &[Beginner, Intermediate],
    use_cases: &[Desktop],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "Lubuntu",
    last_release: "2025-04-17",
    experience: &[Beginner],
    use_cases: &[Desktop, Education],
    hardware: &[LowEnd]
  },
  DistroTags {
    name: "antiX",
    last_release: "2024-10-20",
    experience: &[Intermediate],
    use_cases: &[Desktop],
    hardware: &[LowEnd]
  },
  DistroTags {
    name: "Puppy Linux",
    last_release: "2024-06-05",
    experience: &[Intermediate],
    use_cases: &[Desktop, Education],
    hardware: &[LowEnd]
  },
  DistroTags {
    name: "Tails",
    last_release: "2025-05-20",
    experience: &[Intermediate],
    use_cases: &[Privacy],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "Qubes OS",
    last_release: "2024-12-17",
    experience: &[Advanced],
    use_cases: &[Privacy, Development],
    hardware: &[HighEnd]
  },
  DistroTags {
    name: "Kali Linux",
    last_release: "2025-05-13",
    experience: &[Advanced],
    use_cases: &[Privacy, Development],
    hardware: &[Modern]
  },
  DistroTags {
    name: "Parrot OS",
    last_release: "2025-01-31",
    experience: &[Intermediate, Advanced],
    use_cases: &[Privacy, Development],
    hardware: &[Modern]
  },
  DistroTags {
    name: "Gentoo",
    last_release: "2025-03-02",
    experience: &[Advanced],
    use_cases: &[Development, Server],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Slackware",
    last_release: "2022-02-02",
    experience: &[Advanced],
    use_cases: &[Desktop, Server],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "Void Linux",
    last_release: "2025-05-03",
    experience: &[Advanced],
    use_cases: &[Desktop, Development],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "NixOS",
    last_release: "2025-05-23",
    experience: &[Advanced],
    use_cases: &[Development, Server],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Alpine Linux",
    last_release: "2025-05-30",
    experience: &[Advanced],
    use_cases: &[Server],
    hardware: &[LowEnd, Modern]
  },
  DistroTags {
    name: "Rocky Linux",
    last_release: "2025-06-04",
    experience: &[Intermediate, Advanced],
    use_cases: &[Server],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "AlmaLinux",
    last_release: "2025-05-27",
    experience: &[Intermediate, Advanced],
    use_cases: &[Server],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "CentOS Stream",
    last_release: "2024-12-10",
    experience: &[Advanced],
    use_cases: &[Server, Development],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Garuda Linux",
    last_release: "2025-03-05",
    experience: &[Intermediate],
    use_cases: &[Gaming, Desktop, Multimedia],
    hardware: &[HighEnd]
  },
  DistroTags {
    name: "Nobara",
    last_release: "2025-02-23",
    experience: &[Beginner, Intermediate],
    use_cases: &[Gaming, Multimedia],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Bazzite",
    last_release: "2025-05-10",
    experience: &[Beginner],
    use_cases: &[Gaming, Desktop],
    hardware: &[Modern, HighEnd]
  },
  DistroTags {
    name: "Solus",
    last_release: "2025-01-26",
    experience: &[Beginner, Intermediate],
    use_cases: &[Desktop, Multimedia],
    hardware: &[Modern]
  },
  DistroTags {
    name: "Bodhi Linux",
    last_release: "2024-04-21",
    experience: &[Intermediate],
    use_cases: &[Desktop],
    hardware: &[LowEnd]
  },
  DistroTags {
    name: "Linux Lite",
    last_release: "2025-04-01",
    experience: &[Beginner],
    use_cases: &[Desktop, Education],
    hardware: &[LowEnd]
  },
  DistroTags {
    name: "Peppermint OS",
    last_release: "2024-02-02",
    experience: &[Beginner],
    use_cases: &[Desktop],
    hardware: &[LowEnd]
  },
  DistroTags {
    name: "Deepin",
    last_release: "2025-04-18",
    experience: &[Beginner],
    use_cases: &[Desktop, Multimedia],
    hardware: &[Modern]
  },
  DistroTags {
    name: "KDE neon",
    last_release: "2025-06-12",
    experience: &[Intermediate],
    use_cases: &[Desktop, Development],
    hardware: &[Modern]
  },
  DistroTags {
    name: "Fedora Silverblue",
    last_release: "2025-04-29",
    experience: &[Intermediate, Advanced],
    use_cases: &[Desktop, Development],
    hardware: &[Modern, HighEnd]
  }
];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn catalog_names_are_unique() {
    let mut names: Vec<&str> = CATALOG.iter().map(|r| r.name).collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(total, names.len());
  }

  #[test]
  fn every_record_has_at_least_one_tag_per_dimension() {
    for record in CATALOG {
      assert!(!record.experience.is_empty(), "{}", record.name);
      assert!(!record.use_cases.is_empty(), "{}", record.name);
      assert!(!record.hardware.is_empty(), "{}", record.name);
    }
  }
}
