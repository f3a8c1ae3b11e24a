mod new_repo;
